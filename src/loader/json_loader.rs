use std::path::{Path, PathBuf};

use anyhow::Context;
use macroquad::prelude::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::RendererConfig;
use crate::error::TileError;
use crate::registry::{parse_hex_color, TileInfo, TileRegistry};
use crate::tileset::TileSet;

#[derive(Deserialize)]
struct JsonTile {
    name: String,
    index: u32,
    color: String,
}

#[derive(Deserialize)]
struct JsonRegistry {
    #[serde(default)]
    tiles: Vec<JsonTile>,
}

fn read_json<D: DeserializeOwned>(path: &Path) -> Result<D, TileError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(TileError::UnsupportedFormat(path.display().to_string()));
    }
    let txt = std::fs::read_to_string(path).map_err(|source| TileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode(&txt, path)
}

fn decode<D: DeserializeOwned>(txt: &str, origin: &Path) -> Result<D, TileError> {
    serde_json::from_str(txt).map_err(|source| TileError::Json {
        path: origin.to_path_buf(),
        source,
    })
}

fn tileset_from(ts: TileSet) -> Result<TileSet, TileError> {
    ts.validate()?;
    Ok(ts)
}

fn registry_from(j: JsonRegistry) -> Result<TileRegistry, TileError> {
    let mut reg = TileRegistry::new();
    for t in j.tiles {
        let color = parse_hex_color(&t.color).ok_or_else(|| TileError::InvalidColor {
            name: t.name.clone(),
            value: t.color.clone(),
        })?;
        reg.insert(t.name, TileInfo { index: t.index, color });
    }
    Ok(reg)
}

/// Reads an atlas description such as
/// `{"image":"tiles.png","tilesize":16,"columns":8,"tilecount":64}`.
pub fn decode_tileset_file(path: impl AsRef<Path>) -> Result<TileSet, TileError> {
    tileset_from(read_json(path.as_ref())?)
}

pub fn decode_tileset_str(json: &str) -> Result<TileSet, TileError> {
    tileset_from(decode(json, Path::new("<inline>"))?)
}

/// Reads a tile registry: `{"tiles":[{"name":"grass","index":0,"color":"#3a9d23"}]}`.
pub fn decode_registry_file(path: impl AsRef<Path>) -> Result<TileRegistry, TileError> {
    registry_from(read_json(path.as_ref())?)
}

pub fn decode_registry_str(json: &str) -> Result<TileRegistry, TileError> {
    registry_from(decode(json, Path::new("<inline>"))?)
}

pub fn decode_config_file(path: impl AsRef<Path>) -> Result<RendererConfig, TileError> {
    read_json(path.as_ref())
}

/// Loads the atlas image of `tileset`, relative to `base_dir`.
/// Needs a running macroquad context.
pub async fn load_atlas_texture(tileset: &TileSet, base_dir: &Path) -> anyhow::Result<Texture2D> {
    let img_path: PathBuf = base_dir.join(&tileset.image);
    let path_str = img_path
        .to_str()
        .with_context(|| format!("Atlas path is not UTF-8: {}", img_path.display()))?;
    let tex = load_texture(path_str)
        .await
        .with_context(|| format!("Loading texture {}", tileset.image))?;
    tex.set_filter(FilterMode::Nearest);
    Ok(tex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ColorLookup;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("mq_tile_batch_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn decodes_tileset_with_tiled_style_keys() {
        let ts = decode_tileset_str(
            r#"{"image":"tiles.png","tilesize":16,"columns":8,"tilecount":64,"spacing":1}"#,
        )
        .expect("decode");
        assert_eq!(ts.tile_size, 16);
        assert_eq!(ts.tile_count, 64);
        assert_eq!(ts.margin, 0);
        assert_eq!(ts.atlas_origin(9), (17, 17));
    }

    #[test]
    fn rejects_zero_sized_tiles() {
        let err = decode_tileset_str(r#"{"tile_size":0,"columns":8}"#).unwrap_err();
        assert!(matches!(err, TileError::InvalidTileSet(_)));
    }

    #[test]
    fn decodes_registry_from_file() {
        let dir = temp_dir();
        let path = dir.join("tiles.json");
        fs::write(
            &path,
            r##"{"tiles":[
                {"name":"grass","index":0,"color":"#00ff00"},
                {"name":"water","index":3,"color":"#0000ffff"}
            ]}"##,
        )
        .expect("failed to write registry");

        let reg = decode_registry_file(&path).expect("decode");
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("water").unwrap().index, 3);
        assert_eq!(reg.lookup("grass").unwrap(), Color::from_rgba(0, 255, 0, 255));
    }

    #[test]
    fn returns_typed_error_for_bad_color() {
        let err = decode_registry_str(r#"{"tiles":[{"name":"x","index":0,"color":"red"}]}"#)
            .unwrap_err();
        assert!(matches!(err, TileError::InvalidColor { name, .. } if name == "x"));
    }

    #[test]
    fn returns_typed_error_for_malformed_json() {
        let dir = temp_dir();
        let path = dir.join("tileset.json");
        fs::write(&path, "{ not json").expect("failed to write tileset");

        let err = decode_tileset_file(&path).unwrap_err();
        assert!(matches!(err, TileError::Json { .. }));
    }

    #[test]
    fn returns_typed_error_for_missing_file_and_format() {
        let dir = temp_dir();
        let err = decode_registry_file(dir.join("missing.json")).unwrap_err();
        assert!(matches!(err, TileError::Io { .. }));

        let err = decode_config_file("renderer.toml").unwrap_err();
        assert!(matches!(err, TileError::UnsupportedFormat(p) if p == "renderer.toml"));
    }

    #[test]
    fn decodes_config_file() {
        let dir = temp_dir();
        let path = dir.join("renderer.json");
        fs::write(&path, r#"{"textured":false}"#).expect("failed to write config");
        let cfg = decode_config_file(&path).expect("decode");
        assert!(!cfg.textured);
    }
}
