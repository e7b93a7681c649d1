// crates/hee-core/src/signature.rs

//! Node signature: a stable per-installation identifier used to correlate
//! evidence gathered on different machines.
//!
//! signature = blake3(canonical_kv { host = <short hostname>, install = <uuid> })

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use uuid::Uuid;

use crate::config::Config;
use crate::error::{HeeError, Result};

const FALLBACK_HOST: &str = "localhost";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSignature {
    pub host: String,
    pub install_id: String,
    digest: blake3::Hash,
}

impl NodeSignature {
    pub fn compute(host: &str, install_id: &str) -> Self {
        let canon = canonical_kv(&[("host", host), ("install", install_id)]);
        NodeSignature {
            host: host.to_string(),
            install_id: install_id.to_string(),
            digest: blake3::hash(&canon),
        }
    }

    /// 64 lowercase hex chars.
    pub fn hex(&self) -> String {
        self.digest.to_hex().to_string()
    }

    /// `<first 8>..<last 8>`, for log lines.
    pub fn short(&self) -> String {
        let hex = self.hex();
        format!("{}..{}", &hex[..8], &hex[hex.len() - 8..])
    }
}

/// Keys lowercased and sorted, values trimmed, empty values spelled `null`.
/// One `key=value\n` per pair.
pub fn canonical_kv(pairs: &[(&str, &str)]) -> Vec<u8> {
    let mut items: Vec<(String, &str)> = pairs
        .iter()
        .map(|(k, v)| {
            let v = v.trim();
            (k.trim().to_ascii_lowercase(), if v.is_empty() { "null" } else { v })
        })
        .collect();
    items.sort();

    let mut out = String::new();
    for (k, v) in items {
        out.push_str(&k);
        out.push('=');
        out.push_str(v);
        out.push('\n');
    }
    out.into_bytes()
}

/// `nuc-1.lan.example` -> `nuc-1`
pub fn short_host(full: &str) -> &str {
    full.split('.').next().unwrap_or("").trim()
}

/// Best-effort hostname lookup, never fails.
pub fn detect_host() -> String {
    read_first_line(Path::new("/proc/sys/kernel/hostname"))
        .or_else(|| read_first_line(Path::new("/etc/hostname")))
        .or_else(hostname_command)
        .map(|h| short_host(&h).to_string())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| FALLBACK_HOST.to_string())
}

fn read_first_line(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    let line = text.lines().next()?.trim();
    (!line.is_empty()).then(|| line.to_string())
}

fn hostname_command() -> Option<String> {
    let output = std::process::Command::new("hostname").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!name.is_empty()).then_some(name)
}

/// Read the persisted installation id, creating it on first use.
pub fn load_or_create_install_id(path: &Path) -> Result<String> {
    match read_install_id(path)? {
        Some(id) => Ok(id),
        None => create_install_id(path),
    }
}

fn read_install_id(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let id = text.trim();
            if id.is_empty() {
                return Err(HeeError::io(
                    path,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "installation id file is empty",
                    ),
                ));
            }
            Ok(Some(id.to_string()))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(HeeError::io(path, e)),
    }
}

fn create_install_id(path: &Path) -> Result<String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HeeError::io(parent, e))?;
    }
    let id = Uuid::new_v4().to_string();
    publish_install_id(path, &id, |tmp, dst| std::fs::hard_link(tmp, dst))
}

// Write to a private temp file, then link into place: the id file appears
// complete or not at all, and a concurrent creator's id wins. Where the
// filesystem has no hard links, fall back to an exclusive create.
fn publish_install_id(
    path: &Path,
    id: &str,
    link: impl FnOnce(&Path, &Path) -> std::io::Result<()>,
) -> Result<String> {
    let tmp = path.with_extension(format!("{id}.tmp"));
    std::fs::write(&tmp, format!("{id}\n")).map_err(|e| HeeError::io(&tmp, e))?;
    let linked = link(&tmp, path);
    let _ = std::fs::remove_file(&tmp);

    let placed = match linked {
        Err(e) if matches!(
            e.kind(),
            std::io::ErrorKind::Unsupported | std::io::ErrorKind::PermissionDenied
        ) =>
        {
            tracing::debug!(
                path = %path.display(),
                error = %e,
                "hard link unavailable, creating id file directly"
            );
            write_new(path, id)
        }
        other => other,
    };

    match placed {
        Ok(()) => {
            tracing::info!(path = %path.display(), "installation id created");
            Ok(id.to_string())
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => read_install_id(path)?
            .ok_or_else(|| {
                HeeError::io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "installation id vanished"),
                )
            }),
        Err(e) => Err(HeeError::io(path, e)),
    }
}

fn write_new(path: &Path, id: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(format!("{id}\n").as_bytes())
}

pub fn node_signature(cfg: &Config) -> Result<NodeSignature> {
    let install_id = load_or_create_install_id(&cfg.node_id_path)?;
    let host = detect_host();
    let sig = NodeSignature::compute(&host, &install_id);
    tracing::debug!(host = %sig.host, sig = %sig.short(), "node signature computed");
    Ok(sig)
}
