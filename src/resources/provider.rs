//! # Resource provider abstraction.
//!
//! [`Provider`] is the seam to the external SDK that actually loads, shows and
//! disposes units. The runtime never inspects a unit; it only moves it between
//! the provider and its components.

use async_trait::async_trait;

use crate::error::LoadError;

use super::{request::LoadTarget, session::ShowSession};

/// # Asynchronous source of single-use units.
///
/// Implementations wrap the SDK calls. `load` is the only suspension point of the
/// runtime; `show` starts presentation and reports progress through the
/// [`ShowSession`]; `dispose` releases the unit's resources.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use preloadvisor::{LoadError, LoadTarget, Provider, ShowEvent, ShowSession};
///
/// struct Fake;
///
/// #[async_trait]
/// impl Provider for Fake {
///     type Unit = String;
///
///     async fn load(&self, target: &LoadTarget) -> Result<String, LoadError> {
///         Ok(format!("unit for {}", target.key))
///     }
///
///     fn show(&self, _unit: &String, session: ShowSession) {
///         session.emit(ShowEvent::Showed);
///         session.emit(ShowEvent::Dismissed);
///     }
///
///     fn dispose(&self, _unit: &String) {}
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync + 'static {
    /// Opaque loaded unit.
    type Unit: Send + Sync + 'static;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Bootstraps the underlying SDK. Called once per
    /// [`Manager::initialize_all`](crate::Manager::initialize_all).
    async fn initialize(&self) -> Result<(), LoadError> {
        Ok(())
    }

    /// Loads one unit for `target`.
    async fn load(&self, target: &LoadTarget) -> Result<Self::Unit, LoadError>;

    /// Starts presenting `unit`.
    ///
    /// Lifecycle progress must be reported through `session`. Emitting
    /// [`ShowEvent::Dismissed`](crate::ShowEvent::Dismissed) or
    /// [`ShowEvent::FailedToShow`](crate::ShowEvent::FailedToShow) ends the session
    /// and disposes the unit.
    ///
    /// The session holds the last handle to the unit once it left its pool or slot.
    /// Implementations must keep `session` alive until they report `Dismissed` or
    /// `FailedToShow`: dropping it earlier releases the unit right away, and
    /// [`dispose`](Self::dispose) may then run while the unit is still on screen.
    fn show(&self, unit: &Self::Unit, session: ShowSession);

    /// Releases `unit`. The runtime calls this at most once per unit.
    fn dispose(&self, unit: &Self::Unit);
}
