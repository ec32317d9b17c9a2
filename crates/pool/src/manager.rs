//! Connection factories and their r2d2 adapter.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use kvadmin_core::{Error, Result, StoreConnection};

/// Opens and validates connections for a [`Pool`](crate::Pool).
///
/// Implemented once per transport; the pool wraps it in a
/// [`ConnectionManager`] before handing it to r2d2.
pub trait Connector: Send + Sync + 'static {
    /// Connection type handed out by the pool.
    type Connection: StoreConnection + Send + 'static;

    /// Open a new connection.
    fn connect(&self) -> Result<Self::Connection>;

    /// Round-trip health check. Defaults to `PING`.
    fn is_valid(&self, conn: &mut Self::Connection) -> Result<()> {
        conn.ping()
    }

    /// Cheap local check, no round trip.
    fn has_broken(&self, conn: &mut Self::Connection) -> bool {
        !conn.is_open()
    }
}

/// Adapts a [`Connector`] to [`r2d2::ManageConnection`].
///
/// r2d2 reports only the text of the last failure once a checkout times out,
/// so the manager keeps the last typed error for the pool to surface.
#[derive(Debug)]
pub struct ConnectionManager<C> {
    connector: Arc<C>,
    test_on_return: bool,
    last_error: Arc<Mutex<Option<Error>>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub(crate) fn new(
        connector: Arc<C>,
        test_on_return: bool,
        last_error: Arc<Mutex<Option<Error>>>,
    ) -> Self {
        Self {
            connector,
            test_on_return,
            last_error,
        }
    }

    fn remember(&self, error: &Error) {
        *self.last_error.lock() = Some(error.clone());
    }
}

impl<C: Connector> r2d2::ManageConnection for ConnectionManager<C> {
    type Connection = C::Connection;
    type Error = Error;

    fn connect(&self) -> Result<C::Connection> {
        self.connector.connect().map_err(|e| {
            self.remember(&e);
            e
        })
    }

    fn is_valid(&self, conn: &mut C::Connection) -> Result<()> {
        self.connector.is_valid(conn).map_err(|e| {
            let e = Error::Validation(e.to_string());
            self.remember(&e);
            e
        })
    }

    // Runs on every checkin; a broken connection is closed instead of
    // going back to the idle set.
    fn has_broken(&self, conn: &mut C::Connection) -> bool {
        if self.connector.has_broken(conn) {
            return true;
        }
        self.test_on_return && self.connector.is_valid(conn).is_err()
    }
}

/// Routes r2d2's background connection errors into `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TracingErrorHandler;

impl r2d2::HandleError<Error> for TracingErrorHandler {
    fn handle_error(&self, error: Error) {
        warn!(error = %error, "pooled connection failed");
    }
}

/// Logs connection lifecycle events at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TracingEventHandler;

impl r2d2::HandleEvent for TracingEventHandler {
    fn handle_acquire(&self, event: r2d2::event::AcquireEvent) {
        debug!(id = event.connection_id(), "opened pooled connection");
    }

    fn handle_release(&self, event: r2d2::event::ReleaseEvent) {
        debug!(id = event.connection_id(), age = ?event.age(), "closed pooled connection");
    }

    fn handle_timeout(&self, event: r2d2::event::TimeoutEvent) {
        debug!(timeout = ?event.timeout(), "timed out waiting for a pooled connection");
    }
}
