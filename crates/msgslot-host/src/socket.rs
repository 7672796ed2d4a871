use std::os::unix::fs::{FileTypeExt, PermissionsExt};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;

use tracing::debug;

use crate::error::{HostError, Result};

/// Default permission mode for created socket paths.
const SOCKET_MODE: u32 = 0o600;

/// Maximum socket path length.
/// Unix `sockaddr_un.sun_path` is typically 108 bytes on Linux, 104 on
/// macOS.
#[cfg(target_os = "linux")]
const MAX_PATH_LEN: usize = 108;
#[cfg(not(target_os = "linux"))]
const MAX_PATH_LEN: usize = 104;

/// Bind and listen on a filesystem-path Unix domain socket.
///
/// A stale socket file at `path` is removed first; any other kind of file
/// is refused rather than clobbered.
pub(crate) fn bind(path: &Path) -> Result<UnixListener> {
    let path_bytes = path.as_os_str().len();
    if path_bytes >= MAX_PATH_LEN {
        return Err(HostError::PathTooLong {
            path: path.to_path_buf(),
            len: path_bytes,
            max: MAX_PATH_LEN,
        });
    }

    if path.exists() {
        let metadata = std::fs::symlink_metadata(path).map_err(|source| HostError::Bind {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.file_type().is_socket() {
            debug!(?path, "removing stale socket");
            std::fs::remove_file(path).map_err(|source| HostError::Bind {
                path: path.to_path_buf(),
                source,
            })?;
        } else {
            return Err(HostError::Bind {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "existing path is not a unix socket",
                ),
            });
        }
    }

    let listener = UnixListener::bind(path).map_err(|source| HostError::Bind {
        path: path.to_path_buf(),
        source,
    })?;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(SOCKET_MODE)).map_err(
        |source| HostError::Bind {
            path: path.to_path_buf(),
            source,
        },
    )?;

    Ok(listener)
}

/// Connect to a listening Unix domain socket (blocking).
pub(crate) fn connect(path: &Path) -> Result<UnixStream> {
    let stream = UnixStream::connect(path).map_err(|source| HostError::Connect {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(?path, "connected to slot host");
    Ok(stream)
}

/// Remove a socket file, leaving any non-socket replacement alone.
pub(crate) fn cleanup(path: &Path) {
    if let Ok(metadata) = std::fs::symlink_metadata(path) {
        if metadata.file_type().is_socket() {
            debug!(?path, "cleaning up socket file");
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::path::PathBuf;

    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("msgslot-sock-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn bind_connect_exchange() {
        let dir = temp_dir("bind");
        let path = dir.join("slot.sock");

        let listener = bind(&path).unwrap();
        assert!(path.exists());

        let client_path = path.clone();
        let handle = std::thread::spawn(move || {
            let mut client = connect(&client_path).unwrap();
            client.write_all(b"hello").unwrap();
        });

        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 5];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");

        handle.join().unwrap();
        cleanup(&path);
        assert!(!path.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bind_hardens_permissions() {
        let dir = temp_dir("perms");
        let path = dir.join("slot.sock");

        let _listener = bind(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bind_rejects_existing_non_socket() {
        let dir = temp_dir("nonsock");
        let path = dir.join("not-a-socket");
        std::fs::write(&path, b"regular file").unwrap();

        assert!(matches!(bind(&path), Err(HostError::Bind { .. })));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bind_replaces_stale_socket() {
        let dir = temp_dir("stale");
        let path = dir.join("slot.sock");

        drop(bind(&path).unwrap());
        // The file is still there; a second bind must clean it up.
        assert!(path.exists());
        let _listener = bind(&path).unwrap();

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn overlong_path_is_rejected() {
        let long = PathBuf::from(format!("/tmp/{}.sock", "a".repeat(150)));
        assert!(matches!(bind(&long), Err(HostError::PathTooLong { .. })));
    }

    #[test]
    fn cleanup_leaves_non_socket_files_alone() {
        let dir = temp_dir("cleanup");
        let path = dir.join("kept");
        std::fs::write(&path, b"data").unwrap();

        cleanup(&path);
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
