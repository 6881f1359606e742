//! Callback handles with identity.
//!
//! Registries deduplicate by *identity*, not by behaviour: two separately
//! created callbacks are always distinct, while clones of one [`Callback`]
//! are the same callback.  Identity is the address of the shared closure.

use std::fmt;
use std::rc::Rc;

use settle_core::{BoxError, LoopError};

/// What a frame or equilibrium callback returns.
pub type CallbackResult = Result<(), BoxError>;

/// A shared, cloneable callback taking no arguments.
///
/// ```rust,ignore
/// let redraw = Callback::new(move || canvas.redraw());
/// scheduler.on_update(redraw.clone()).on_update(redraw); // registered once
/// ```
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn() -> CallbackResult>);

impl Callback {
    /// Wrap an infallible closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() + 'static,
    {
        Self(Rc::new(move || {
            f();
            Ok(())
        }))
    }

    /// Wrap a closure whose failures are reported through the scheduler's
    /// error channel.
    pub fn fallible<F, E>(f: F) -> Self
    where
        F: Fn() -> Result<(), E> + 'static,
        E: Into<BoxError>,
    {
        Self(Rc::new(move || f().map_err(Into::into)))
    }

    #[inline]
    pub fn call(&self) -> CallbackResult {
        (self.0)()
    }

    /// `true` if `a` and `b` are clones of the same callback.
    #[inline]
    pub fn same(a: &Callback, b: &Callback) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&a.0), Rc::as_ptr(&b.0))
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0))
    }
}

/// A shared, cloneable receiver for reported loop failures.
#[derive(Clone)]
pub struct ErrorCallback(Rc<dyn Fn(&LoopError)>);

impl ErrorCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&LoopError) + 'static,
    {
        Self(Rc::new(f))
    }

    #[inline]
    pub fn call(&self, error: &LoopError) {
        (self.0)(error)
    }

    #[inline]
    pub fn same(a: &ErrorCallback, b: &ErrorCallback) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&a.0), Rc::as_ptr(&b.0))
    }
}

impl fmt::Debug for ErrorCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorCallback({:p})", Rc::as_ptr(&self.0))
    }
}
