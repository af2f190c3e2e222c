use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `<artifact>.meta.json` describing how the artifact was produced.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, params: Value) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = sidecar_path(artifact);
    if let Some(parent) = sidecar.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating sidecar dir {}", parent.display()))?;
        }
    }
    let doc = json!({
        "tool": format!("facemesh {}", facemesh::VERSION),
        "params": params,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    let mut name = stem;
    name.push(".meta.json");
    artifact.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn sidecar_path_rewrites_extension() {
        let base = Path::new("/tmp/output/mesh.png");
        assert_eq!(sidecar_path(base), Path::new("/tmp/output/mesh.meta.json"));
    }

    #[test]
    fn write_sidecar_creates_file() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("mesh.png");
        fs::write(&artifact, []).unwrap();
        let path = write_sidecar(&artifact, json!({"landmarks": 68})).unwrap();
        assert!(path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["params"]["landmarks"], 68);
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
    }
}
