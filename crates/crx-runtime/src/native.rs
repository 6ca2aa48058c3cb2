//! Native popup windows: a wry webview filling a frameless winit window.
//!
//! winit windows and wry webviews must stay on the event-loop thread, so the
//! handles given to [`PopupWindowController`](crate::PopupWindowController)
//! only post [`NativeCommand`]s through an `EventLoopProxy`. The application
//! hands those commands, and its window events, to a [`NativePopupHost`]
//! from its `ApplicationHandler`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crx_common::{Rect, Size, WindowError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use winit::dpi::{LogicalPosition, LogicalSize};
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::window::{Window, WindowButtons, WindowId, WindowLevel};
use wry::{WebView, WebViewBuilder};

use crate::popup::{Placement, PopupWindow, PopupWindowSpec, WindowEvent, WindowFactory};

/// Work for the event-loop thread. Delivered as the event loop's user event.
pub enum NativeCommand {
    Create {
        id: u64,
        spec: PopupWindowSpec,
        events: mpsc::UnboundedSender<WindowEvent>,
        state: Arc<NativeState>,
    },
    Show(u64),
    Close(u64),
    Destroy(u64),
    SetBounds(u64, Rect),
    SetSize(u64, Size),
    Center(u64),
    Evaluate {
        id: u64,
        script: String,
        reply: oneshot::Sender<Option<serde_json::Value>>,
    },
}

/// Window state mirrored off the event-loop thread.
#[derive(Debug, Default)]
pub struct NativeState {
    destroyed: AtomicBool,
    devtools_open: AtomicBool,
}

pub struct NativeWindowFactory {
    proxy: Mutex<EventLoopProxy<NativeCommand>>,
    next_id: AtomicU64,
}

impl NativeWindowFactory {
    pub fn new(proxy: EventLoopProxy<NativeCommand>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
            next_id: AtomicU64::new(1),
        }
    }
}

impl WindowFactory for NativeWindowFactory {
    fn create(
        &self,
        spec: PopupWindowSpec,
        events: mpsc::UnboundedSender<WindowEvent>,
    ) -> Result<Arc<dyn PopupWindow>, WindowError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let state = Arc::new(NativeState::default());
        let proxy = self
            .proxy
            .lock()
            .map_err(|_| WindowError::Create("event loop proxy poisoned".into()))?
            .clone();

        proxy
            .send_event(NativeCommand::Create {
                id,
                spec,
                events,
                state: Arc::clone(&state),
            })
            .map_err(|_| WindowError::Create("event loop closed".into()))?;

        Ok(Arc::new(NativePopupWindow {
            id,
            proxy: Mutex::new(proxy),
            state,
        }))
    }
}

/// Handle to a popup living on the event-loop thread.
pub struct NativePopupWindow {
    id: u64,
    proxy: Mutex<EventLoopProxy<NativeCommand>>,
    state: Arc<NativeState>,
}

impl NativePopupWindow {
    fn post(&self, command: NativeCommand) {
        let sent = match self.proxy.lock() {
            Ok(proxy) => proxy.send_event(command).is_ok(),
            Err(_) => false,
        };
        if !sent {
            debug!(id = self.id, "native popup command dropped: event loop gone");
        }
    }
}

#[async_trait]
impl PopupWindow for NativePopupWindow {
    fn show(&self) {
        self.post(NativeCommand::Show(self.id));
    }

    fn close(&self) {
        self.post(NativeCommand::Close(self.id));
    }

    fn destroy(&self) {
        self.state.destroyed.store(true, Ordering::Release);
        self.post(NativeCommand::Destroy(self.id));
    }

    fn is_destroyed(&self) -> bool {
        self.state.destroyed.load(Ordering::Acquire)
    }

    fn is_devtools_open(&self) -> bool {
        self.state.devtools_open.load(Ordering::Acquire)
    }

    fn set_bounds(&self, bounds: Rect) {
        self.post(NativeCommand::SetBounds(self.id, bounds));
    }

    fn set_bounds_animated(&self, bounds: Rect, _animate: bool) {
        // winit has no animated variant.
        self.post(NativeCommand::SetBounds(self.id, bounds));
    }

    fn set_size(&self, size: Size) {
        self.post(NativeCommand::SetSize(self.id, size));
    }

    fn center(&self) {
        self.post(NativeCommand::Center(self.id));
    }

    async fn execute_script(&self, script: &str) -> Option<serde_json::Value> {
        let (reply, rx) = oneshot::channel();
        self.post(NativeCommand::Evaluate {
            id: self.id,
            script: script.to_string(),
            reply,
        });
        rx.await.ok().flatten()
    }
}

struct NativeEntry {
    window: Window,
    webview: WebView,
    events: mpsc::UnboundedSender<WindowEvent>,
    state: Arc<NativeState>,
}

impl NativeEntry {
    fn fit_webview(&self) {
        let size: LogicalSize<f64> = self.window.inner_size().to_logical(self.window.scale_factor());
        if let Err(e) = self.webview.set_bounds(webview_bounds(Size::new(size.width, size.height))) {
            warn!(error = %e, "failed to fit popup webview");
        }
    }

    fn refresh_devtools(&self) {
        #[cfg(any(debug_assertions, feature = "devtools"))]
        self.state
            .devtools_open
            .store(self.webview.is_devtools_open(), Ordering::Release);
    }
}

/// Owns every native popup. Lives on the event-loop thread.
#[derive(Default)]
pub struct NativePopupHost {
    entries: HashMap<u64, NativeEntry>,
    by_window: HashMap<WindowId, u64>,
}

impl NativePopupHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Run a command posted by a [`NativePopupWindow`].
    pub fn handle_command(&mut self, event_loop: &ActiveEventLoop, command: NativeCommand) {
        match command {
            NativeCommand::Create {
                id,
                spec,
                events,
                state,
            } => match build_entry(event_loop, &spec, events.clone(), Arc::clone(&state)) {
                Ok(entry) => {
                    self.by_window.insert(entry.window.id(), id);
                    self.entries.insert(id, entry);
                    debug!(id, "native popup created");
                }
                Err(e) => {
                    warn!(id, error = %e, "native popup creation failed");
                    state.destroyed.store(true, Ordering::Release);
                    let _ = events.send(WindowEvent::Closed);
                }
            },
            NativeCommand::Show(id) => {
                if let Some(entry) = self.entries.get(&id) {
                    entry.window.set_visible(true);
                    entry.window.focus_window();
                    let _ = entry.events.send(WindowEvent::Shown);
                }
            }
            NativeCommand::Close(id) | NativeCommand::Destroy(id) => self.remove(id),
            NativeCommand::SetBounds(id, bounds) => {
                if let Some(entry) = self.entries.get(&id) {
                    entry
                        .window
                        .set_outer_position(LogicalPosition::new(bounds.x, bounds.y));
                    let _ = entry
                        .window
                        .request_inner_size(LogicalSize::new(bounds.width, bounds.height));
                    entry.fit_webview();
                }
            }
            NativeCommand::SetSize(id, size) => {
                if let Some(entry) = self.entries.get(&id) {
                    let _ = entry
                        .window
                        .request_inner_size(LogicalSize::new(size.width, size.height));
                    entry.fit_webview();
                }
            }
            NativeCommand::Center(id) => {
                if let Some(entry) = self.entries.get(&id) {
                    center_on_monitor(&entry.window);
                }
            }
            NativeCommand::Evaluate { id, script, reply } => {
                let Some(entry) = self.entries.get(&id) else {
                    let _ = reply.send(None);
                    return;
                };
                let reply = Mutex::new(Some(reply));
                let result = entry
                    .webview
                    .evaluate_script_with_callback(&script, move |result: String| {
                        if let Some(reply) = reply.lock().ok().and_then(|mut slot| slot.take()) {
                            let _ = reply.send(serde_json::from_str(&result).ok());
                        }
                    });
                if let Err(e) = result {
                    debug!(id, error = %e, "popup script evaluation failed");
                }
            }
        }
    }

    /// Translate a winit event for one of our windows into popup events.
    pub fn handle_window_event(&mut self, window_id: WindowId, event: &winit::event::WindowEvent) {
        let Some(&id) = self.by_window.get(&window_id) else {
            return;
        };
        match event {
            winit::event::WindowEvent::Focused(false) => {
                if let Some(entry) = self.entries.get(&id) {
                    entry.refresh_devtools();
                    let _ = entry.events.send(WindowEvent::Blurred);
                }
            }
            winit::event::WindowEvent::Resized(_) => {
                if let Some(entry) = self.entries.get(&id) {
                    entry.fit_webview();
                }
            }
            winit::event::WindowEvent::CloseRequested | winit::event::WindowEvent::Destroyed => {
                self.remove(id);
            }
            _ => {}
        }
    }

    fn remove(&mut self, id: u64) {
        let Some(entry) = self.entries.remove(&id) else {
            return;
        };
        self.by_window.remove(&entry.window.id());
        entry.state.destroyed.store(true, Ordering::Release);
        let _ = entry.events.send(WindowEvent::Closed);
        debug!(id, "native popup closed");
    }
}

fn build_entry(
    event_loop: &ActiveEventLoop,
    spec: &PopupWindowSpec,
    events: mpsc::UnboundedSender<WindowEvent>,
    state: Arc<NativeState>,
) -> Result<NativeEntry, WindowError> {
    let size = spec.placement.size();
    let mut attributes = Window::default_attributes()
        .with_title(spec.title.clone().unwrap_or_default())
        .with_decorations(spec.frame)
        .with_resizable(spec.resizable)
        .with_visible(spec.show)
        .with_active(spec.focusable)
        .with_enabled_buttons(WindowButtons::empty())
        .with_inner_size(LogicalSize::new(size.width, size.height))
        .with_window_level(if spec.always_on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        });
    if let Placement::Anchored(bounds) = spec.placement {
        attributes = attributes.with_position(LogicalPosition::new(bounds.x, bounds.y));
    }

    let window = event_loop
        .create_window(attributes)
        .map_err(|e| WindowError::Create(e.to_string()))?;

    let block_new_windows = spec.block_new_windows;
    let new_window_events = events.clone();
    let mut builder = WebViewBuilder::new()
        .with_bounds(webview_bounds(size))
        .with_background_color(spec.background_color.as_tuple())
        .with_devtools(spec.capabilities.devtools)
        .with_new_window_req_handler(move |url: String| {
            let _ = new_window_events.send(WindowEvent::NewWindowRequested { url });
            !block_new_windows
        });
    if let Some(url) = &spec.url {
        builder = builder.with_url(url);
    }

    let webview = builder
        .build_as_child(&window)
        .map_err(|e| WindowError::Create(e.to_string()))?;

    Ok(NativeEntry {
        window,
        webview,
        events,
        state,
    })
}

/// Bounds of a webview filling a window of `size`.
fn webview_bounds(size: Size) -> wry::Rect {
    wry::Rect {
        position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(0.0, 0.0)),
        size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(size.width, size.height)),
    }
}

fn center_on_monitor(window: &Window) {
    let Some(monitor) = window.current_monitor() else {
        return;
    };
    let scale = monitor.scale_factor();
    let origin: LogicalPosition<f64> = monitor.position().to_logical(scale);
    let area: LogicalSize<f64> = monitor.size().to_logical(scale);
    let outer: LogicalSize<f64> = window.outer_size().to_logical(window.scale_factor());

    let screen = Rect::new(origin.x, origin.y, area.width, area.height);
    let position = screen.center_of(Size::new(outer.width, outer.height));
    window.set_outer_position(LogicalPosition::new(position.x, position.y));
}
