//! Simple HTTP/1.1 server.
//!
//! Listens for requests and passes them to a single root handler, usually a
//! [`Router`](super::Router) wrapped in [`Obscure`](crate::obscure::Obscure).
//! Each connection is served by its own Tokio task.

use super::{Error, Handler, Request, Response};

use crate::colors::MaybeColorize;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tokio::select;
use tokio::signal::ctrl_c;
use tracing::{debug, error, info};

/// HTTP server.
pub struct Server {
    handler: Arc<dyn Handler>,
}

impl Server {
    /// Create new HTTP server serving all requests with the given handler.
    pub fn new(handler: impl Handler + 'static) -> Self {
        Server {
            handler: Arc::new(handler),
        }
    }

    /// Launch the server. This blocks until the server is shut down (`SIGINT`/Ctrl-C).
    pub async fn launch(self, addr: impl AsRef<str>) -> Result<(), Error> {
        info!(
            "Starting {} {} {}",
            "Obscurer".green(),
            "HTTP".purple(),
            "server".red()
        );

        let listener = TcpListener::bind(addr.as_ref()).await?;

        select! {
            _ = ctrl_c() => {
                info!("Shutting down...");
                Ok(())
            }

            result = self.serve(listener) => result,
        }
    }

    /// Accept connections on an existing listener, forever.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        info!("Listening on {}", listener.local_addr()?);

        loop {
            let (stream, peer_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    debug!("{} accept error: {}", "http".purple(), err);
                    continue;
                }
            };

            let handler = self.handler.clone();
            tokio::spawn(async move {
                Self::handle_connection(handler, stream, peer_addr).await;
            });
        }
    }

    async fn handle_connection(handler: Arc<dyn Handler>, stream: TcpStream, peer_addr: SocketAddr) {
        let mut stream = BufReader::new(BufWriter::new(stream));
        debug!("{} new connection from {:?}", "http".purple(), peer_addr);

        loop {
            let request = match Request::read(peer_addr, &mut stream).await {
                Ok(request) => request,
                Err(err) => {
                    if err.code() == 400 {
                        let _ = Self::send_response(&mut stream, Response::bad_request()).await;
                    }

                    debug!(
                        "{} client {:?} disconnected: {}",
                        "http".purple(),
                        peer_addr,
                        err
                    );
                    return;
                }
            };

            let start = Instant::now();

            // Pass the request to the handler to get a response.
            let mut response = Response::new();
            if let Err(err) = handler.handle(&request, &mut response).await {
                error!("{}", err);
                response = Response::internal_error(err);
            }

            let keep_alive = request.keep_alive();
            let response = response.header(
                "connection",
                if keep_alive { "keep-alive" } else { "close" },
            );

            Self::log(&request, handler.handler_name(), &response, start.elapsed());

            // A closed connection is the client's problem; don't retry.
            if let Err(err) = Self::send_response(&mut stream, response).await {
                debug!("{} error {:?}", peer_addr, err);
                break;
            }

            if !keep_alive {
                break;
            }
        }
    }

    fn log(request: &Request, handler_name: &str, response: &Response, duration: Duration) {
        let method = request.method().to_string();
        let path = request.path();
        let code = response.status().code();
        let duration = (duration.as_secs_f64() * 1000.0) as f32;

        info!(
            "{} {} {} {} ({:.3} ms)",
            method.purple(),
            path.purple(),
            handler_name.green(),
            code,
            duration,
        );
    }

    async fn send_response(
        mut stream: impl AsyncWrite + Unpin,
        response: Response,
    ) -> Result<(), Error> {
        response.send(&mut stream).await?;
        stream.flush().await?;

        Ok(())
    }
}
