//! Extension popup windows.
//!
//! A popup is a frameless, always-on-top window hanging off the right edge
//! of the window that opened it. It has no fixed size: while visible, its
//! content is measured on a timer and the window is refitted (and
//! re-anchored, in case the opener moved). It closes as soon as it loses
//! focus unless its devtools are open.

mod geometry;
mod observer;
mod probe;
mod sanitize;
mod types;
mod window;


use std::sync::{Arc, Mutex, Weak};

use crx_common::{ContextId, CrxError, Rect, Size};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, trace};

pub use geometry::{anchored_bounds, host_bounds_applier, AnimatedBounds, BoundsApplier, PlainBounds};
pub use observer::{PopupEvent, PopupObserver};
pub use probe::{measurement_script, parse_measurement};
pub use sanitize::{CapabilitySanitizer, GuestCapabilitySanitizer, WebCapabilities};
pub use types::{Placement, PopupOptions, PopupSettings, PopupState, PopupWindowSpec};
pub use window::{PopupWindow, WindowEvent, WindowFactory, WindowLocator};

/// Collaborators shared by every popup a host opens.
#[derive(Clone)]
pub struct PopupEnvironment {
    factory: Arc<dyn WindowFactory>,
    locator: Arc<dyn WindowLocator>,
    sanitizer: Arc<dyn CapabilitySanitizer>,
    applier: Arc<dyn BoundsApplier>,
    settings: PopupSettings,
}

impl PopupEnvironment {
    /// Guest sanitizer, the host platform's bounds applier and default
    /// settings.
    pub fn new(factory: Arc<dyn WindowFactory>, locator: Arc<dyn WindowLocator>) -> Self {
        Self {
            factory,
            locator,
            sanitizer: Arc::new(GuestCapabilitySanitizer),
            applier: host_bounds_applier(),
            settings: PopupSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: PopupSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn CapabilitySanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn with_applier(mut self, applier: Arc<dyn BoundsApplier>) -> Self {
        self.applier = applier;
        self
    }

    pub fn settings(&self) -> &PopupSettings {
        &self.settings
    }
}

/// Owns one popup window and its resize timer. Dropping the controller
/// destroys the window.
pub struct PopupWindowController {
    inner: Arc<PopupInner>,
}

struct PopupInner {
    opening_context: ContextId,
    locator: Arc<dyn WindowLocator>,
    applier: Arc<dyn BoundsApplier>,
    resize_interval: Duration,
    anchor_offset_y: f64,
    probe_script: String,
    window: Mutex<Option<Arc<dyn PopupWindow>>>,
    resize_task: Mutex<Option<JoinHandle<()>>>,
    state: Mutex<PopupState>,
    observer: Mutex<Box<dyn PopupObserver>>,
}

impl PopupWindowController {
    /// Create the popup for `opening_context` and show it.
    ///
    /// The window is created hidden and then shown, so the observer's
    /// `on_show` marks the moment the popup is really on screen. Must be
    /// called inside a tokio runtime.
    pub fn open(
        env: &PopupEnvironment,
        opening_context: ContextId,
        mut options: PopupOptions,
        observer: impl PopupObserver,
    ) -> Result<Self, CrxError> {
        let settings = &env.settings;
        let capabilities = env
            .sanitizer
            .sanitize(options.capabilities.take().unwrap_or_default());

        let placement = match env.locator.locate(opening_context) {
            Some(opener) => Placement::Anchored(anchored_bounds(
                opener,
                settings.default_size,
                settings.anchor_offset_y,
            )),
            None => {
                debug!(context = %opening_context, "opener not found, popup placed by system");
                Placement::Unpositioned(settings.default_size)
            }
        };

        let spec = PopupWindowSpec::new(options, capabilities, placement, settings.background_color);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let window = env.factory.create(spec, events_tx)?;

        let inner = Arc::new(PopupInner {
            opening_context,
            locator: Arc::clone(&env.locator),
            applier: Arc::clone(&env.applier),
            resize_interval: settings.resize_interval,
            anchor_offset_y: settings.anchor_offset_y,
            probe_script: measurement_script(settings.background_color),
            window: Mutex::new(Some(Arc::clone(&window))),
            resize_task: Mutex::new(None),
            state: Mutex::new(PopupState::Constructed),
            observer: Mutex::new(Box::new(observer)),
        });

        tokio::spawn(pump_window_events(events_rx, Arc::downgrade(&inner)));

        debug!(context = %opening_context, ?placement, "popup created");
        window.show();

        Ok(Self { inner })
    }

    /// The live window, or `None` once it has closed or been destroyed.
    pub fn window(&self) -> Option<Arc<dyn PopupWindow>> {
        self.inner.current_window()
    }

    pub fn opening_context(&self) -> ContextId {
        self.inner.opening_context
    }

    pub fn state(&self) -> PopupState {
        self.inner.state()
    }

    /// Destroy the window and stop the resize loop. Later calls, or calls
    /// after the window closed on its own, do nothing.
    pub fn destroy(&self) {
        self.inner.destroy();
    }
}

impl Drop for PopupWindowController {
    fn drop(&mut self) {
        self.inner.destroy();
    }
}

async fn pump_window_events(mut events: mpsc::UnboundedReceiver<WindowEvent>, inner: Weak<PopupInner>) {
    while let Some(event) = events.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.handle_event(event);
    }
}

async fn run_resize_loop(inner: Weak<PopupInner>, period: Duration) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.auto_resize().await;
    }
}

impl PopupInner {
    fn handle_event(self: &Arc<Self>, event: WindowEvent) {
        match event {
            WindowEvent::Shown => self.handle_show(),
            WindowEvent::Blurred => self.handle_blur(),
            WindowEvent::Closed => self.handle_closed(),
            WindowEvent::NewWindowRequested { url } => {
                debug!(context = %self.opening_context, url = %url, "popup new-window request suppressed");
            }
        }
    }

    fn handle_show(self: &Arc<Self>) {
        // Held until the loop is registered: a concurrent destroy either
        // cancels the new loop or keeps it from starting.
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.is_terminal() {
            return;
        }

        let task = tokio::spawn(run_resize_loop(Arc::downgrade(self), self.resize_interval));
        if let Ok(mut slot) = self.resize_task.lock() {
            if let Some(previous) = slot.replace(task) {
                previous.abort();
            }
        }
        *state = PopupState::Shown;
        drop(state);

        debug!(context = %self.opening_context, "popup shown");
        self.notify(|observer| observer.on_show());
    }

    fn handle_blur(&self) {
        let Some(window) = self.current_window() else {
            return;
        };
        if window.is_devtools_open() {
            trace!("popup blurred with devtools open, keeping it");
            return;
        }
        window.close();
    }

    fn handle_closed(&self) {
        self.cancel_resize();
        self.take_window();

        let first = match self.state.lock() {
            Ok(mut state) if *state != PopupState::Closed => {
                *state = PopupState::Closed;
                true
            }
            _ => false,
        };
        if first {
            debug!(context = %self.opening_context, "popup closed");
            self.notify(|observer| observer.on_closed());
        }
    }

    fn destroy(&self) {
        if let Ok(mut state) = self.state.lock() {
            if !state.is_terminal() {
                *state = PopupState::Destroyed;
            }
        }
        self.cancel_resize();

        let Some(window) = self.take_window() else {
            return;
        };
        if !window.is_destroyed() {
            window.destroy();
        }
        debug!(context = %self.opening_context, "popup destroyed");
    }

    /// One resize tick: measure the content, then refit the window.
    async fn auto_resize(&self) {
        let Some(window) = self.current_window() else {
            return;
        };

        let measured = window.execute_script(&self.probe_script).await;
        let Some(size) = parse_measurement(measured.as_ref()) else {
            trace!("popup measurement missed, skipping tick");
            return;
        };

        // The window may have gone away while the probe was in flight.
        let Some(window) = self.current_window() else {
            return;
        };
        if window.is_destroyed() {
            return;
        }

        match self.positioning(size) {
            Some(bounds) => self.applier.apply(window.as_ref(), bounds),
            None => {
                window.set_size(size);
                window.center();
            }
        }
    }

    fn positioning(&self, size: Size) -> Option<Rect> {
        self.locator
            .locate(self.opening_context)
            .map(|opener| anchored_bounds(opener, size, self.anchor_offset_y))
    }

    fn current_window(&self) -> Option<Arc<dyn PopupWindow>> {
        self.window.lock().ok().and_then(|slot| slot.clone())
    }

    fn take_window(&self) -> Option<Arc<dyn PopupWindow>> {
        self.window.lock().ok().and_then(|mut slot| slot.take())
    }

    fn cancel_resize(&self) {
        if let Ok(mut slot) = self.resize_task.lock() {
            if let Some(task) = slot.take() {
                task.abort();
            }
        }
    }

    fn state(&self) -> PopupState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(PopupState::Destroyed)
    }

    fn notify(&self, f: impl FnOnce(&mut dyn PopupObserver)) {
        if let Ok(mut observer) = self.observer.lock() {
            f(observer.as_mut());
        }
    }
}
