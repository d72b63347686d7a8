//! Application event loop.
//!
//! [`run`] opens a window (or a canvas inside the page on the web), builds the
//! viewer and its camera panel, then reacts to events:
//!
//! 1. GPU setup finishes: draw the first frame and mount the page panel
//! 2. A panel value changes: the controller's callback redraws
//! 3. The window is resized or asks for a redraw: redraw
//!
//! Natively the panel is drawn as a column of sliders over the scene, driven
//! by mouse drags and the keyboard. On the web it is a set of page inputs.
//!
//! Nothing redraws continuously; frames are only produced in response to an
//! event.

use std::{fmt::Debug, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{ModifiersState, PhysicalKey},
    window::Window,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::{
    config::ViewerConfig,
    context::Context,
    panel::{PanelInput, ParamPanel},
    render::WgpuRenderer,
    scene::{Viewer, camera_panel},
};

#[cfg(not(target_arch = "wasm32"))]
use crate::{panel::overlay::SliderOverlay, render::Renderer};

/// Viewer and panel, created once the GPU is ready.
pub struct AppState {
    pub viewer: Viewer<WgpuRenderer>,
    pub panel: ParamPanel<Viewer<WgpuRenderer>>,
    window: Arc<Window>,
    #[cfg(target_arch = "wasm32")]
    dom_panel: Option<crate::panel::dom::DomPanel>,
    #[cfg(not(target_arch = "wasm32"))]
    overlay: SliderOverlay,
    #[cfg(not(target_arch = "wasm32"))]
    cursor: [f32; 2],
    /// Row being dragged with the left mouse button.
    #[cfg(not(target_arch = "wasm32"))]
    dragging: Option<usize>,
}

impl AppState {
    async fn new(window: Arc<Window>, config: ViewerConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window.clone()).await?;
        let viewer = Viewer::new(&config, WgpuRenderer::new(ctx));
        let panel = camera_panel(&viewer);
        Ok(Self {
            viewer,
            panel,
            window,
            #[cfg(target_arch = "wasm32")]
            dom_panel: None,
            #[cfg(not(target_arch = "wasm32"))]
            overlay: SliderOverlay::default(),
            #[cfg(not(target_arch = "wasm32"))]
            cursor: [0.0; 2],
            #[cfg(not(target_arch = "wasm32"))]
            dragging: None,
        })
    }

    /// Mirror the panel after a change that did not originate from the page.
    fn refresh_panel(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.window.set_title(&self.panel.summary(&self.viewer));
            let size = self.viewer.renderer.size();
            let vertices = self.overlay.vertices(&self.panel, &self.viewer, size);
            self.viewer.renderer.set_overlay(&vertices);
            // the value change already rendered, with the previous sliders
            self.window.request_redraw();
        }

        #[cfg(target_arch = "wasm32")]
        if let Some(dom_panel) = &self.dom_panel {
            dom_panel.sync(&self.panel, &self.viewer);
        }
    }

    fn apply(&mut self, input: PanelInput) {
        // focus changes alter the summary too
        self.panel.apply(&mut self.viewer, input);
        self.refresh_panel();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn pointer_moved(&mut self, position: [f32; 2]) {
        self.cursor = position;
        if let Some(index) = self.dragging {
            let fraction = self
                .overlay
                .fraction(index, self.viewer.renderer.size(), position[0]);
            if self.panel.set_fraction(&mut self.viewer, index, fraction) {
                self.refresh_panel();
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn pointer_button(&mut self, pressed: bool) {
        if !pressed {
            self.dragging = None;
            return;
        }
        let size = self.viewer.renderer.size();
        if let Some((index, fraction)) = self.overlay.hit(self.panel.len(), size, self.cursor) {
            self.dragging = Some(index);
            self.panel.focus(index);
            self.panel.set_fraction(&mut self.viewer, index, fraction);
            self.refresh_panel();
        }
    }
}

impl Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("viewer", &self.viewer)
            .field("panel", &self.panel)
            .finish()
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(Box<AppState>),
    /// A page slider moved.
    #[allow(dead_code)]
    Panel { index: usize, value: f32 },
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::Panel { index, value } => f
                .debug_struct("Panel")
                .field("index", index)
                .field("value", value)
                .finish(),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(dead_code)]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    config: ViewerConfig,
    state: Option<AppState>,
    modifiers: ModifiersState,
    started: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: ViewerConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            state: None,
            modifiers: ModifiersState::empty(),
            started: Instant::now(),
        })
    }

    fn initialized(&mut self, mut state: AppState) {
        log::info!("initialized after {:?}", self.started.elapsed());
        let size = state.window.inner_size();
        state.viewer.resize(size.width, size.height);

        #[cfg(target_arch = "wasm32")]
        {
            match mount_dom_panel(&self.config, &state, self.proxy.clone()) {
                Ok(dom_panel) => state.dom_panel = Some(dom_panel),
                Err(e) => panic!("App initialization failed. Cannot mount the panel: {:#}", e),
            }
        }

        state.refresh_panel();
        state.viewer.render();
        self.state = Some(state);
    }
}

impl Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(self.config.title);

        #[cfg(not(target_arch = "wasm32"))]
        {
            let [width, height] = self.config.window_size;
            window_attributes =
                window_attributes.with_inner_size(winit::dpi::PhysicalSize::new(width, height));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Unable to create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        #[cfg(target_arch = "wasm32")]
        if let Err(e) = attach_canvas(&window, &self.config) {
            panic!("App initialization failed. Cannot attach the canvas: {:#}", e);
        }

        let init_future = AppState::new(window, self.config.clone());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let state = match self.async_runtime.block_on(init_future) {
                Ok(state) => state,
                Err(e) => panic!(
                    "App initialization failed. Cannot create the main context: {:#}",
                    e
                ),
            };
            self.initialized(state);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = match init_future.await {
                    Ok(state) => state,
                    Err(e) => panic!(
                        "App initialization failed. Cannot create the main context: {:#}",
                        e
                    ),
                };
                assert!(proxy.send_event(FlowEvent::Initialized(Box::new(state))).is_ok());
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(state) => self.initialized(*state),
            FlowEvent::Panel { index, value } => {
                if let Some(state) = &mut self.state {
                    state.panel.set_value(&mut state.viewer, index, value);
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                state.viewer.resize(size.width, size.height);
                state.refresh_panel();
                state.viewer.render();
            }
            WindowEvent::RedrawRequested => state.viewer.render(),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::CursorMoved { position, .. } => {
                state.pointer_moved([position.x as f32, position.y as f32])
            }
            #[cfg(not(target_arch = "wasm32"))]
            WindowEvent::MouseInput {
                state: button_state,
                button: winit::event::MouseButton::Left,
                ..
            } => state.pointer_button(button_state == ElementState::Pressed),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if let Some(input) = PanelInput::from_key(code, self.modifiers.shift_key()) {
                    log::debug!("panel input {:?}", input);
                    state.apply(input);
                }
            }
            _ => {}
        }
    }
}

/// Put the window's canvas inside the page element named by the config.
#[cfg(target_arch = "wasm32")]
fn attach_canvas(window: &Window, config: &ViewerConfig) -> anyhow::Result<()> {
    use anyhow::Context as _;
    use winit::platform::web::WindowExtWebSys;

    let canvas = window.canvas().context("the window has no canvas")?;
    let document = web_sys::window()
        .and_then(|w| w.document())
        .context("no document to attach to")?;
    let host = config.find_container(|id| document.get_element_by_id(id))?;
    host.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("appending the canvas: {:?}", e))?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn mount_dom_panel(
    config: &ViewerConfig,
    state: &AppState,
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
) -> anyhow::Result<crate::panel::dom::DomPanel> {
    use anyhow::Context as _;
    use std::rc::Rc;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .context("no document to mount the panel in")?;
    let host = config.find_container(|id| document.get_element_by_id(id))?;
    let on_input: Rc<dyn Fn(usize, f32)> = Rc::new(move |index, value| {
        if proxy.send_event(FlowEvent::Panel { index, value }).is_err() {
            log::warn!("event loop closed, dropping panel input");
        }
    });
    crate::panel::dom::DomPanel::mount(&document, &host, &state.panel, &state.viewer, on_input)
        .map_err(|e| anyhow::anyhow!("mounting the panel: {:?}", e))
}

pub fn run(config: ViewerConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
