use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::admin::SettingsForm;
use crate::archive::PackageDeployer;
use crate::builders::{BuilderError, ImageInventory, ImageInventoryBuilder, MarkupBuilder};
use crate::cache::{Cache, CacheError};
use crate::env::{self, EnvError, EnvVar};
use crate::settings::{CacheInvalidator, SettingsError, SettingsStore};
use crate::utils::url::PublicUrlGenerator;

/// Represents errors that can occur while deriving favicon output
///
/// This error type encapsulates all possible errors that can occur
/// when working with the favpack library.
#[derive(Debug)]
pub struct FavpackError {
    details: String,
}

impl FavpackError {
    /// Creates a new FavpackError with the given message
    pub fn new(msg: &str) -> FavpackError {
        FavpackError {
            details: msg.to_string(),
        }
    }
}

impl fmt::Display for FavpackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.details)
    }
}

impl Error for FavpackError {}

impl From<BuilderError> for FavpackError {
    fn from(error: BuilderError) -> Self {
        FavpackError::new(&error.to_string())
    }
}

impl From<CacheError> for FavpackError {
    fn from(error: CacheError) -> Self {
        FavpackError::new(&error.to_string())
    }
}

impl From<SettingsError> for FavpackError {
    fn from(error: SettingsError) -> Self {
        FavpackError::new(&error.to_string())
    }
}

impl From<EnvError> for FavpackError {
    fn from(error: EnvError) -> Self {
        FavpackError::new(&error.to_string())
    }
}

/// Configuration options for the favpack library
///
/// All collaborators are handed in explicitly at construction time;
/// there is no ambient container. `cache_db: None` selects an
/// ephemeral cache database that lives as long as the process.
#[derive(Debug, Clone)]
pub struct FavpackOptions {
    /// Directory the favicon package is unpacked into
    pub assets_dir: PathBuf,
    /// Public URL prefix of the assets directory (absolute or root-relative)
    pub public_base_url: String,
    /// Path of the persisted settings record
    pub settings_file: PathBuf,
    /// Path of the cache database; `None` for an ephemeral one
    pub cache_db: Option<PathBuf>,
}

impl Default for FavpackOptions {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("public/favpack"),
            public_base_url: "/files/favpack".to_string(),
            settings_file: PathBuf::from("config/favpack.toml"),
            cache_db: None,
        }
    }
}

impl FavpackOptions {
    /// Assembles options from `FAVPACK_*` environment variables
    pub fn from_env() -> Result<Self, EnvError> {
        Ok(Self {
            assets_dir: PathBuf::from(env::AssetsDir::get()?),
            public_base_url: env::PublicBaseUrl::get()?,
            settings_file: PathBuf::from(env::SettingsFile::get()?),
            cache_db: env::CacheDb::get().ok().map(PathBuf::from),
        })
    }
}

/// The favicon manager
///
/// Facade over the two derived-value builders. Both values are served
/// from the tag-invalidated cache and recomputed from the current
/// settings record and assets directory after any settings change.
pub struct FaviconManager {
    markup: MarkupBuilder,
    images: ImageInventoryBuilder,
    urls: PublicUrlGenerator,
}

impl FaviconManager {
    pub fn new(store: Arc<SettingsStore>, cache: Arc<Cache>, options: &FavpackOptions) -> Self {
        let urls =
            PublicUrlGenerator::new(options.assets_dir.clone(), &options.public_base_url);

        Self {
            markup: MarkupBuilder::new(
                store,
                cache.clone(),
                options.assets_dir.clone(),
                urls.clone(),
            ),
            images: ImageInventoryBuilder::new(cache, options.assets_dir.clone()),
            urls,
        }
    }

    /// Get the HTML markup for the favicon
    pub fn markup(&self) -> Result<String, FavpackError> {
        Ok(self.markup.build()?)
    }

    /// Get the available images
    pub fn images(&self) -> Result<ImageInventory, FavpackError> {
        Ok(self.images.build()?)
    }

    /// Map an asset path to its public URL
    pub fn public_url(&self, path: &Path) -> Option<String> {
        self.urls.generate(path)
    }
}

/// A fully wired favpack instance
///
/// Owns the settings store (with the package deployer and cache
/// invalidator subscribed, in that order), the cache, and the manager.
pub struct Favpack {
    pub store: Arc<SettingsStore>,
    pub cache: Arc<Cache>,
    pub manager: Arc<FaviconManager>,
}

impl Favpack {
    /// Opens (or creates) all state described by the options
    pub fn open(options: FavpackOptions) -> Result<Self, FavpackError> {
        let cache = Arc::new(match &options.cache_db {
            Some(path) => Cache::open(path)?,
            None => Cache::ephemeral()?,
        });

        let mut store = SettingsStore::new(options.settings_file.clone());
        store.subscribe(Box::new(PackageDeployer::new(options.assets_dir.clone())));
        store.subscribe(Box::new(CacheInvalidator::new(cache.clone())));
        let store = Arc::new(store);

        let manager = Arc::new(FaviconManager::new(store.clone(), cache.clone(), &options));

        Ok(Self {
            store,
            cache,
            manager,
        })
    }

    /// Builds the settings form submission model over this store
    pub fn settings_form(&self) -> SettingsForm {
        SettingsForm::new(self.store.clone())
    }
}
