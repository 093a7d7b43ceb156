//! Resource loading and the path-keyed handle cache
//!
//! The simulation never sees pixels or samples: it only carries
//! [`ResourceHandle`]s plus the image size it needs for collision boxes.
//! Everything is loaded once at startup; any failure is fatal.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{self, Cursor};
use std::path::PathBuf;

use glam::DVec2;
use image::ImageReader;

use crate::audio::Cue;
use crate::config::GameConfig;
use crate::error::AssetError;
use crate::sim::{EnemySkin, Stage};

/// Opaque reference to a loaded resource, stable for the whole process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceHandle(u32);

impl ResourceHandle {
    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Sound,
    Font,
}

/// An image handle together with its pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRef {
    pub handle: ResourceHandle,
    pub size: DVec2,
}

/// Backend that actually touches resources
pub trait ResourceLoader {
    /// Load an image, returning its size in pixels
    fn load_image(&mut self, path: &str) -> Result<DVec2, AssetError>;
    fn load_sound(&mut self, path: &str) -> Result<(), AssetError>;
    fn load_font(&mut self, path: &str) -> Result<(), AssetError>;
}

#[derive(Debug, Clone)]
struct CachedResource {
    kind: ResourceKind,
    size: Option<DVec2>,
}

/// Path-keyed cache: the first request loads, later requests share the handle
#[derive(Debug, Default)]
pub struct ResourceCache {
    by_path: HashMap<String, ResourceHandle>,
    entries: Vec<CachedResource>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(
        &mut self,
        path: &str,
        loader: &mut dyn ResourceLoader,
    ) -> Result<SpriteRef, AssetError> {
        let handle = self.get_or_load(path, ResourceKind::Image, loader)?;
        let size = self.entries[handle.0 as usize].size.unwrap_or(DVec2::ZERO);
        Ok(SpriteRef { handle, size })
    }

    pub fn sound(
        &mut self,
        path: &str,
        loader: &mut dyn ResourceLoader,
    ) -> Result<ResourceHandle, AssetError> {
        self.get_or_load(path, ResourceKind::Sound, loader)
    }

    pub fn font(
        &mut self,
        path: &str,
        loader: &mut dyn ResourceLoader,
    ) -> Result<ResourceHandle, AssetError> {
        self.get_or_load(path, ResourceKind::Font, loader)
    }

    fn get_or_load(
        &mut self,
        path: &str,
        kind: ResourceKind,
        loader: &mut dyn ResourceLoader,
    ) -> Result<ResourceHandle, AssetError> {
        if let Some(&handle) = self.by_path.get(path) {
            let cached = &self.entries[handle.0 as usize];
            if cached.kind != kind {
                return Err(AssetError::Corrupt {
                    path: path.to_string(),
                    reason: format!("requested as {kind:?}, already loaded as {:?}", cached.kind),
                });
            }
            return Ok(handle);
        }

        let size = match kind {
            ResourceKind::Image => Some(loader.load_image(path)?),
            ResourceKind::Sound => {
                loader.load_sound(path)?;
                None
            }
            ResourceKind::Font => {
                loader.load_font(path)?;
                None
            }
        };

        let handle = ResourceHandle(self.entries.len() as u32);
        self.entries.push(CachedResource {
            kind,
            size,
        });
        self.by_path.insert(path.to_string(), handle);
        log::debug!("Loaded {kind:?} {path} as #{}", handle.0);
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Loads from the filesystem under a root directory
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let full = self.root.join(path);
        let bytes = fs::read(&full).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound(full.display().to_string()),
            _ => AssetError::Io {
                path: full.display().to_string(),
                source,
            },
        })?;
        if bytes.is_empty() {
            return Err(AssetError::Corrupt {
                path: path.to_string(),
                reason: "file is empty".into(),
            });
        }
        Ok(bytes)
    }
}

impl ResourceLoader for FsLoader {
    /// Decodes only the header, for the size
    fn load_image(&mut self, path: &str) -> Result<DVec2, AssetError> {
        let bytes = self.read(path)?;
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|source| AssetError::Io {
                path: path.to_string(),
                source,
            })?
            .into_dimensions()
            .map_err(|e| AssetError::Corrupt {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        if width == 0 || height == 0 {
            return Err(AssetError::Corrupt {
                path: path.to_string(),
                reason: "image has no pixels".into(),
            });
        }
        Ok(DVec2::new(f64::from(width), f64::from(height)))
    }

    fn load_sound(&mut self, path: &str) -> Result<(), AssetError> {
        self.read(path).map(|_| ())
    }

    fn load_font(&mut self, path: &str) -> Result<(), AssetError> {
        self.read(path).map(|_| ())
    }
}

/// Stand-in loader for headless runs: every image has a fixed size
#[derive(Debug, Clone)]
pub struct PlaceholderLoader {
    default_size: DVec2,
    sizes: HashMap<String, DVec2>,
}

impl PlaceholderLoader {
    pub fn new(default_size: DVec2) -> Self {
        Self {
            default_size,
            sizes: HashMap::new(),
        }
    }

    /// Give one path its own size
    pub fn with_size(mut self, path: &str, size: DVec2) -> Self {
        self.sizes.insert(path.to_string(), size);
        self
    }
}

impl Default for PlaceholderLoader {
    fn default() -> Self {
        Self::new(DVec2::new(64.0, 64.0))
    }
}

impl ResourceLoader for PlaceholderLoader {
    fn load_image(&mut self, path: &str) -> Result<DVec2, AssetError> {
        Ok(self.sizes.get(path).copied().unwrap_or(self.default_size))
    }

    fn load_sound(&mut self, _path: &str) -> Result<(), AssetError> {
        Ok(())
    }

    fn load_font(&mut self, _path: &str) -> Result<(), AssetError> {
        Ok(())
    }
}

/// Sprites shared by every level
#[derive(Debug, Clone)]
pub struct Sprites {
    pub player: SpriteRef,
    pub primary_laser: SpriteRef,
    pub special_laser: SpriteRef,
    pub hit_effect: SpriteRef,
}

#[derive(Debug, Clone, Copy)]
pub struct Fonts {
    pub score: ResourceHandle,
    pub stats: ResourceHandle,
}

/// Everything the session needs, resolved from a [`GameConfig`]
#[derive(Debug)]
pub struct Assets {
    pub sprites: Sprites,
    pub fonts: Fonts,
    /// One stage per configured level, in order
    pub stages: Vec<Stage>,
    pub sounds: BTreeMap<Cue, ResourceHandle>,
    pub cache: ResourceCache,
}

impl Assets {
    /// Load every resource the config names. The config must be validated.
    pub fn load(config: &GameConfig, loader: &mut dyn ResourceLoader) -> Result<Self, AssetError> {
        let mut cache = ResourceCache::new();
        let paths = &config.assets;

        let sprites = Sprites {
            player: cache.image(&paths.player, loader)?,
            primary_laser: cache.image(&paths.primary_laser, loader)?,
            special_laser: cache.image(&paths.special_laser, loader)?,
            hit_effect: cache.image(&paths.hit_effect, loader)?,
        };

        let fonts = Fonts {
            score: cache.font(&paths.score_font, loader)?,
            stats: cache.font(&paths.stats_font, loader)?,
        };

        let mut sounds = BTreeMap::new();
        for (cue, path) in [
            (Cue::LaserPrimary, &paths.laser_sound),
            (Cue::LaserSpecial, &paths.special_sound),
            (Cue::Burst, &paths.burst_sound),
            (Cue::Collide, &paths.collide_sound),
            (Cue::Explosion, &paths.explosion_sound),
            (Cue::Powerup, &paths.powerup_sound),
        ] {
            sounds.insert(cue, cache.sound(path, loader)?);
        }

        let mut stages = Vec::with_capacity(config.levels.len());
        for level in &config.levels {
            let mut palette = Vec::with_capacity(level.palette.len());
            for key in &level.palette {
                let skin = config
                    .palettes
                    .get(key)
                    .ok_or_else(|| AssetError::NotFound(format!("palette '{key}'")))?;
                palette.push(EnemySkin {
                    key: key.clone(),
                    standard: cache.image(&skin.standard, loader)?,
                    elite: cache.image(&skin.elite, loader)?,
                });
            }
            stages.push(Stage {
                background: cache.image(&level.background, loader)?,
                music: cache.sound(&level.music, loader)?,
                palette,
                score_threshold: level.score_threshold,
            });
        }

        log::info!(
            "Loaded {} resources for {} levels",
            cache.len(),
            stages.len()
        );

        Ok(Self {
            sprites,
            fonts,
            stages,
            sounds,
            cache,
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    /// Loader that fails for one path and counts loads
    struct CountingLoader {
        missing: &'static str,
        loads: usize,
    }

    impl ResourceLoader for CountingLoader {
        fn load_image(&mut self, path: &str) -> Result<DVec2, AssetError> {
            self.loads += 1;
            if path == self.missing {
                Err(AssetError::NotFound(path.to_string()))
            } else {
                Ok(DVec2::new(10.0, 20.0))
            }
        }
        fn load_sound(&mut self, _path: &str) -> Result<(), AssetError> {
            self.loads += 1;
            Ok(())
        }
        fn load_font(&mut self, _path: &str) -> Result<(), AssetError> {
            self.loads += 1;
            Ok(())
        }
    }

    #[test]
    fn test_cache_loads_each_path_once() {
        let mut loader = CountingLoader {
            missing: "",
            loads: 0,
        };
        let mut cache = ResourceCache::new();
        let a = cache.image("ship.png", &mut loader).unwrap();
        let b = cache.image("ship.png", &mut loader).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.size, DVec2::new(10.0, 20.0));
        assert_eq!(loader.loads, 1);
    }

    #[test]
    fn test_cache_rejects_kind_mismatch() {
        let mut loader = PlaceholderLoader::default();
        let mut cache = ResourceCache::new();
        cache.sound("boom.wav", &mut loader).unwrap();
        assert!(matches!(
            cache.image("boom.wav", &mut loader),
            Err(AssetError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_missing_asset_is_fatal() {
        let config = GameConfig::default();
        let mut loader = CountingLoader {
            missing: "assets/ssr/PNG/Lasers/laserBlue07.png",
            loads: 0,
        };
        let err = Assets::load(&config, &mut loader).unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[test]
    fn test_assets_resolve_every_level() {
        let config = GameConfig::default();
        let assets = Assets::load(&config, &mut PlaceholderLoader::default()).unwrap();
        assert_eq!(assets.stages.len(), config.levels.len());
        assert_eq!(assets.stages[2].palette.len(), 3);
        assert!(assets.sounds.contains_key(&Cue::Explosion));
    }

    /// Fresh scratch directory under the system temp dir
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("star-strike-{name}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_fs_loader_reads_image_size() {
        let dir = scratch_dir("image-size");
        image::RgbaImage::new(99, 75).save(dir.join("ship.png")).unwrap();

        let mut loader = FsLoader::new(&dir);
        assert_eq!(loader.load_image("ship.png").unwrap(), DVec2::new(99.0, 75.0));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_fs_loader_rejects_non_image() {
        let dir = scratch_dir("non-image");
        fs::write(dir.join("laser.png"), b"RIFF....WAVEfmt ").unwrap();
        fs::write(dir.join("empty.png"), b"").unwrap();

        let mut loader = FsLoader::new(&dir);
        assert!(matches!(
            loader.load_image("laser.png"),
            Err(AssetError::Corrupt { .. })
        ));
        assert!(matches!(
            loader.load_image("empty.png"),
            Err(AssetError::Corrupt { .. })
        ));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_fs_loader_missing_file() {
        let mut loader = FsLoader::new("/nonexistent-asset-root");
        assert!(matches!(
            loader.load_image("ship.png"),
            Err(AssetError::NotFound(_))
        ));
    }
}
