//! `crx-host popup <url>`: one native popup, kept up until it closes.

use std::sync::Arc;

use crx_common::{ContextId, CrxError, Rect, WindowError};
use crx_config::CrxConfig;
use crx_runtime::native::{NativeCommand, NativePopupHost, NativeWindowFactory};
use crx_runtime::{PopupEnvironment, PopupOptions, PopupSettings, PopupWindowController};
use tracing::{info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

struct PopupApp {
    host: NativePopupHost,
    env: PopupEnvironment,
    url: String,
    controller: Option<PopupWindowController>,
    seen_window: bool,
}

impl PopupApp {
    fn exit_when_empty(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.count() > 0 {
            self.seen_window = true;
        } else if self.seen_window {
            info!("popup closed, exiting");
            self.controller = None;
            event_loop.exit();
        }
    }
}

impl ApplicationHandler<NativeCommand> for PopupApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.controller.is_some() {
            return;
        }
        match PopupWindowController::open(
            &self.env,
            ContextId(0),
            PopupOptions::with_url(self.url.clone()),
            (),
        ) {
            Ok(controller) => self.controller = Some(controller),
            Err(e) => {
                warn!(error = %e, "failed to open popup");
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, command: NativeCommand) {
        self.host.handle_command(event_loop, command);
        self.exit_when_empty(event_loop);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        self.host.handle_window_event(window_id, &event);
        self.exit_when_empty(event_loop);
    }
}

/// Run the event loop until the popup for `url` closes. Must be called on
/// the main thread from inside a tokio runtime context.
pub fn run(config: &CrxConfig, url: String) -> Result<(), CrxError> {
    let event_loop = EventLoop::<NativeCommand>::with_user_event()
        .build()
        .map_err(|e| WindowError::Create(e.to_string()))?;

    let env = PopupEnvironment::new(
        Arc::new(NativeWindowFactory::new(event_loop.create_proxy())),
        Arc::new(|_: ContextId| -> Option<Rect> { None }),
    )
    .with_settings(PopupSettings::from(&config.popup));

    let mut app = PopupApp {
        host: NativePopupHost::new(),
        env,
        url,
        controller: None,
        seen_window: false,
    };

    info!("Entering event loop");
    event_loop
        .run_app(&mut app)
        .map_err(|e| CrxError::Other(format!("event loop error: {e}")))
}
