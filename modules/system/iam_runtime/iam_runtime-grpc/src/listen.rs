//! Listen address parsing and the tonic server loop.

use std::fmt;
use std::net::SocketAddr;
#[cfg(unix)]
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::service::Routes;
use tonic::transport::Server;

const UDS_SCHEME: &str = "uds://";

/// Where the gRPC server listens.
///
/// - TCP: `"127.0.0.1:50051"` or `"0.0.0.0:0"` for an ephemeral port
/// - Unix domain socket (Unix only): `"uds:///path/to/socket.sock"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenAddr {
    Tcp(SocketAddr),
    #[cfg(unix)]
    Uds(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ListenAddrError {
    #[error("invalid listen address '{addr}': {source}")]
    InvalidTcp {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("UDS listen address has an empty path: '{0}'")]
    EmptyUdsPath(String),

    #[error("UDS listen address is not supported on this platform: '{0}'")]
    UdsUnsupported(String),
}

impl FromStr for ListenAddr {
    type Err = ListenAddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(path) = s.strip_prefix(UDS_SCHEME) {
            if path.is_empty() {
                return Err(ListenAddrError::EmptyUdsPath(s.to_owned()));
            }
            #[cfg(unix)]
            return Ok(Self::Uds(PathBuf::from(path)));
            #[cfg(not(unix))]
            return Err(ListenAddrError::UdsUnsupported(s.to_owned()));
        }

        s.parse()
            .map(Self::Tcp)
            .map_err(|source| ListenAddrError::InvalidTcp {
                addr: s.to_owned(),
                source,
            })
    }
}

impl fmt::Display for ListenAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(addr) => write!(f, "{addr}"),
            #[cfg(unix)]
            Self::Uds(path) => write!(f, "{UDS_SCHEME}{}", path.display()),
        }
    }
}

/// Bind `listen` and serve `routes` until `cancel` fires.
///
/// # Errors
/// Returns an error if binding fails or the server terminates abnormally.
pub async fn serve(
    listen: &ListenAddr,
    routes: Routes,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    match listen {
        ListenAddr::Tcp(addr) => {
            let listener = TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind TCP listener at '{addr}'"))?;
            serve_with_listener(listener, routes, cancel).await
        }
        #[cfg(unix)]
        ListenAddr::Uds(path) => serve_uds(path, routes, cancel).await,
    }
}

/// Serve `routes` on an already bound TCP listener until `cancel` fires.
///
/// # Errors
/// Returns an error if the server terminates abnormally.
pub async fn serve_with_listener(
    listener: TcpListener,
    routes: Routes,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let bound_addr = listener.local_addr()?;
    tracing::info!(%bound_addr, transport = "tcp", "gRPC server listening");

    let incoming = TcpListenerStream::new(listener);
    Server::builder()
        .add_routes(routes)
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await?;

    tracing::info!("gRPC server stopped");
    Ok(())
}

#[cfg(unix)]
async fn serve_uds(
    path: &std::path::Path,
    routes: Routes,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    use tokio::net::UnixListener;
    use tokio_stream::wrappers::UnixListenerStream;

    remove_stale_socket(path);

    let uds = UnixListener::bind(path)
        .with_context(|| format!("failed to bind UDS listener at '{}'", path.display()))?;
    tracing::info!(path = %path.display(), transport = "uds", "gRPC server listening");

    let incoming = UnixListenerStream::new(uds);
    let result = Server::builder()
        .add_routes(routes)
        .serve_with_incoming_shutdown(incoming, async move {
            cancel.cancelled().await;
        })
        .await;

    remove_stale_socket(path);
    result?;

    tracing::info!("gRPC server stopped");
    Ok(())
}

#[cfg(unix)]
fn remove_stale_socket(path: &std::path::Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed UDS socket file");
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to remove UDS socket file"
            );
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn parses_tcp() {
        let addr: ListenAddr = "127.0.0.1:50051".parse().unwrap();
        assert_eq!(addr, ListenAddr::Tcp("127.0.0.1:50051".parse().unwrap()));
        assert_eq!(addr.to_string(), "127.0.0.1:50051");
    }

    #[test]
    fn parses_ephemeral_tcp() {
        let addr: ListenAddr = "0.0.0.0:0".parse().unwrap();
        assert!(matches!(addr, ListenAddr::Tcp(a) if a.port() == 0));
    }

    #[test]
    fn rejects_garbage() {
        let err = "localhost".parse::<ListenAddr>().unwrap_err();
        assert!(matches!(err, ListenAddrError::InvalidTcp { .. }));
        assert!(err.to_string().contains("'localhost'"));
    }

    #[test]
    fn rejects_empty_uds_path() {
        let err = "uds://".parse::<ListenAddr>().unwrap_err();
        assert!(matches!(err, ListenAddrError::EmptyUdsPath(_)));
    }

    #[cfg(unix)]
    #[test]
    fn parses_uds() {
        let addr: ListenAddr = "uds:///tmp/iam.sock".parse().unwrap();
        assert_eq!(addr, ListenAddr::Uds(PathBuf::from("/tmp/iam.sock")));
        assert_eq!(addr.to_string(), "uds:///tmp/iam.sock");
    }

    #[cfg(not(unix))]
    #[test]
    fn uds_unsupported_off_unix() {
        let err = "uds:///tmp/iam.sock".parse::<ListenAddr>().unwrap_err();
        assert!(matches!(err, ListenAddrError::UdsUnsupported(_)));
    }
}
