use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use bytemuck::{Pod, Zeroable};
use shared::session::{EditMode, Session};
use shared::viewport::ResizePolicy;
use wgpu::util::DeviceExt;
use wgpu::StoreOp;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowAttributes, WindowId};

const CELL_SIZE: u32 = 16;
const CELL_GAP: f32 = 0.5;
const STEP_INTERVAL: Duration = Duration::from_millis(100);
const UI_HEIGHT: f32 = 90.0;
const BUTTON_WIDTH: f32 = 96.0;
const BUTTON_HEIGHT: f32 = 34.0;
const BUTTON_GAP: f32 = 10.0;
const BUTTON_ROW_Y: f32 = 48.0;
const MARGIN: f32 = 24.0;
const TEXT_SCALE_HEADING: f32 = 4.0;
const TEXT_SCALE_BUTTON: f32 = 2.5;
const TEXT_SCALE_STATUS: f32 = 2.5;
const GRID_BASE_VERTEX_COUNT: u32 = 6;
const FONT_WIDTH: usize = 5;
const FONT_HEIGHT: usize = 7;

const ALIVE_COLOR: [f32; 3] = [0.10, 0.10, 0.12];
const DEAD_COLOR: [f32; 3] = [0.94, 0.94, 0.92];
// The backdrop shows through the per-cell gap as the constant outline.
const OUTLINE_COLOR: [f32; 3] = [0.58, 0.58, 0.60];
const PANEL_COLOR: [f32; 3] = [0.13, 0.14, 0.18];
const PANEL_EDGE_COLOR: [f32; 3] = [0.25, 0.33, 0.55];
const BUTTON_COLOR: [f32; 3] = [0.25, 0.33, 0.55];
const BUTTON_HOVER_COLOR: [f32; 3] = [0.35, 0.45, 0.75];
const BUTTON_ACTIVE_COLOR: [f32; 3] = [0.20, 0.55, 0.35];
const TEXT_COLOR: [f32; 3] = [0.92, 0.92, 0.95];

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Command {
    Start,
    Stop,
    Clear,
    Randomize,
    Slow,
    Accelerate,
}

const BUTTONS: &[(&str, Command)] = &[
    ("START", Command::Start),
    ("STOP", Command::Stop),
    ("CLEAR", Command::Clear),
    ("RANDOM", Command::Randomize),
    ("SLOWER", Command::Slow),
    ("FASTER", Command::Accelerate),
];

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CellInstance {
    min: [f32; 2],
    max: [f32; 2],
    color: [f32; 3],
    _pad: f32,
}

#[derive(Copy, Clone)]
struct Rect {
    min: [f32; 2],
    max: [f32; 2],
}

impl Rect {
    fn contains(&self, point: [f32; 2]) -> bool {
        point[0] >= self.min[0] && point[0] <= self.max[0] && point[1] >= self.min[1] && point[1] <= self.max[1]
    }
}

struct State {
    #[allow(dead_code)]
    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    grid_pipeline: wgpu::RenderPipeline,
    ui_pipeline: wgpu::RenderPipeline,
    grid_vertex_buffer: wgpu::Buffer,
    grid_instance_buffer: wgpu::Buffer,
    grid_instance_capacity: usize,
    ui_vertex_buffer: wgpu::Buffer,
    ui_vertex_capacity: usize,
}

impl State {
    async fn new(window: Arc<Window>, initial_cells: usize) -> anyhow::Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::VULKAN,
            flags: wgpu::InstanceFlags::from_env_or_default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let surface = instance.create_surface(window.clone()).context("create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("request adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::default(),
            })
            .await
            .context("request device")?;

        let capabilities = surface.get_capabilities(&adapter);
        let surface_format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .unwrap_or(capabilities.formats[0]);

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: capabilities.alpha_modes[0],
            desired_maximum_frame_latency: 1,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let grid_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("grid_pipeline_layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let ui_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ui_pipeline_layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let grid_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_vertex_buffer"),
            contents: bytemuck::cast_slice(&[[0.0_f32, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let grid_instance_capacity = initial_cells.next_power_of_two();
        let grid_instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("grid_instance_buffer"),
            size: (grid_instance_capacity * std::mem::size_of::<CellInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let ui_vertex_capacity = 8192;
        let ui_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ui_vertex_buffer"),
            size: (ui_vertex_capacity * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let grid_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grid_pipeline"),
            layout: Some(&grid_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_grid"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2,
                        }],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<CellInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            wgpu::VertexAttribute {
                                offset: 0,
                                shader_location: 1,
                                format: wgpu::VertexFormat::Float32x2,
                            },
                            wgpu::VertexAttribute {
                                offset: 8,
                                shader_location: 2,
                                format: wgpu::VertexFormat::Float32x2,
                            },
                            wgpu::VertexAttribute {
                                offset: 16,
                                shader_location: 3,
                                format: wgpu::VertexFormat::Float32x3,
                            },
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let ui_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ui_pipeline"),
            layout: Some(&ui_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_ui"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x2,
                        },
                        wgpu::VertexAttribute {
                            offset: 8,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3,
                        },
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            instance,
            surface,
            device,
            queue,
            config,
            size,
            grid_pipeline,
            ui_pipeline,
            grid_vertex_buffer,
            grid_instance_buffer,
            grid_instance_capacity,
            ui_vertex_buffer,
            ui_vertex_capacity,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    fn ensure_grid_instance_capacity(&mut self, required_instances: usize) {
        if required_instances <= self.grid_instance_capacity {
            return;
        }
        self.grid_instance_capacity = required_instances.next_power_of_two();
        self.grid_instance_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("grid_instance_buffer"),
            size: (self.grid_instance_capacity * std::mem::size_of::<CellInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
    }

    fn ensure_ui_vertex_capacity(&mut self, required_vertices: usize) {
        if required_vertices <= self.ui_vertex_capacity {
            return;
        }
        self.ui_vertex_capacity = required_vertices.next_power_of_two();
        self.ui_vertex_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ui_vertex_buffer"),
            size: (self.ui_vertex_capacity * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
    }

    fn render(&mut self, instances: &[CellInstance], ui_vertices: &[Vertex]) -> std::result::Result<(), wgpu::SurfaceError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                match err {
                    wgpu::SurfaceError::Lost => {
                        self.surface.configure(&self.device, &self.config);
                    }
                    wgpu::SurfaceError::OutOfMemory => return Err(err),
                    _ => {}
                }
                self.surface.get_current_texture()?
            }
        };

        if !instances.is_empty() {
            self.ensure_grid_instance_capacity(instances.len());
            self.queue.write_buffer(&self.grid_instance_buffer, 0, bytemuck::cast_slice(instances));
        }

        if !ui_vertices.is_empty() {
            self.ensure_ui_vertex_capacity(ui_vertices.len());
            self.queue.write_buffer(&self.ui_vertex_buffer, 0, bytemuck::cast_slice(ui_vertices));
        }

        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("encoder") });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: OUTLINE_COLOR[0] as f64,
                            g: OUTLINE_COLOR[1] as f64,
                            b: OUTLINE_COLOR[2] as f64,
                            a: 1.0,
                        }),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if !instances.is_empty() {
                render_pass.set_pipeline(&self.grid_pipeline);
                render_pass.set_vertex_buffer(0, self.grid_vertex_buffer.slice(..));
                let instance_bytes = std::mem::size_of_val(instances) as u64;
                render_pass.set_vertex_buffer(1, self.grid_instance_buffer.slice(0..instance_bytes));
                render_pass.draw(0..GRID_BASE_VERTEX_COUNT, 0..instances.len() as u32);
            }

            if !ui_vertices.is_empty() {
                render_pass.set_pipeline(&self.ui_pipeline);
                let vertex_bytes = std::mem::size_of_val(ui_vertices) as u64;
                render_pass.set_vertex_buffer(0, self.ui_vertex_buffer.slice(0..vertex_bytes));
                render_pass.draw(0..ui_vertices.len() as u32, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

struct LifeApp {
    session: Session,
    window_size: PhysicalSize<u32>,
    cursor_position: Option<[f32; 2]>,
    painting: bool,
    instances: Vec<CellInstance>,
    ui_vertices: Vec<Vertex>,
}

impl LifeApp {
    fn new(window_size: PhysicalSize<u32>) -> Self {
        let session = Session::new(
            ResizePolicy::FixedCellSize { cell_size: CELL_SIZE },
            EditMode::Paint,
            window_size.width,
            board_height(window_size),
            STEP_INTERVAL,
        );
        let cells = session.viewport().rows() * session.viewport().cols();
        log::info!(
            "board {}x{} at {CELL_SIZE} px cells",
            session.viewport().rows(),
            session.viewport().cols()
        );
        Self {
            session,
            window_size,
            cursor_position: None,
            painting: false,
            instances: Vec::with_capacity(cells),
            ui_vertices: Vec::with_capacity(4096),
        }
    }

    fn cell_count(&self) -> usize {
        self.session.viewport().rows() * self.session.viewport().cols()
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.window_size = size;
        self.session.resize(size.width, board_height(size));
    }

    fn update(&mut self, now: Instant) {
        self.session.update(now);
    }

    fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::Start => self.session.start(now),
            Command::Stop => self.session.stop(),
            Command::Clear => self.session.clear(),
            Command::Randomize => self.session.randomize(),
            Command::Slow => self.session.slow(),
            Command::Accelerate => self.session.accelerate(),
        }
        log::debug!(
            "{command:?}: running={} interval={} ms",
            self.session.is_running(),
            self.session.playback().interval().as_millis()
        );
    }

    fn pointer_pressed(&mut self, position: [f32; 2], now: Instant) {
        if position[1] < UI_HEIGHT {
            if let Some(command) = self.command_at(position) {
                self.apply(command, now);
            }
            return;
        }
        self.painting = true;
        self.session.pointer_down(position[0], position[1] - UI_HEIGHT);
    }

    fn pointer_moved(&mut self, position: [f32; 2]) {
        self.cursor_position = Some(position);
        if self.painting && position[1] >= UI_HEIGHT {
            self.session.pointer_drag(position[0], position[1] - UI_HEIGHT);
        }
    }

    fn pointer_released(&mut self) {
        self.painting = false;
    }

    fn button_rect(&self, index: usize) -> Rect {
        let x = MARGIN + index as f32 * (BUTTON_WIDTH + BUTTON_GAP);
        Rect {
            min: [x, BUTTON_ROW_Y],
            max: [x + BUTTON_WIDTH, BUTTON_ROW_Y + BUTTON_HEIGHT],
        }
    }

    fn command_at(&self, position: [f32; 2]) -> Option<Command> {
        BUTTONS
            .iter()
            .enumerate()
            .find(|(index, _)| self.button_rect(*index).contains(position))
            .map(|(_, (_, command))| *command)
    }

    fn build_frame(&mut self) -> (&[CellInstance], &[Vertex]) {
        self.instances.clear();
        self.ui_vertices.clear();

        let width = self.window_size.width.max(1) as f32;
        let height = self.window_size.height.max(1) as f32;
        let window = [width, height];
        let cell_size = self.session.viewport().cell_size() as f32;

        for (row_index, row) in self.session.grid.cells.iter().enumerate() {
            for (col_index, cell) in row.iter().enumerate() {
                let x = col_index as f32 * cell_size;
                let y = UI_HEIGHT + row_index as f32 * cell_size;
                let min = [to_ndc(x + CELL_GAP, width), to_ndc_y(y + CELL_GAP, height)];
                let max = [
                    to_ndc(x + cell_size - CELL_GAP, width),
                    to_ndc_y(y + cell_size - CELL_GAP, height),
                ];
                let color = if cell.is_alive() { ALIVE_COLOR } else { DEAD_COLOR };
                self.instances.push(CellInstance { min, max, color, _pad: 0.0 });
            }
        }

        let panel = Rect {
            min: [0.0, 0.0],
            max: [width, UI_HEIGHT - 4.0],
        };
        push_rect(&mut self.ui_vertices, panel, PANEL_COLOR, window);
        let panel_edge = Rect {
            min: [0.0, UI_HEIGHT - 4.0],
            max: [width, UI_HEIGHT],
        };
        push_rect(&mut self.ui_vertices, panel_edge, PANEL_EDGE_COLOR, window);

        draw_text(
            &mut self.ui_vertices,
            "GAME OF LIFE",
            [MARGIN, 14.0],
            TEXT_SCALE_HEADING,
            TEXT_COLOR,
            window,
        );

        let status = format!(
            "GEN {}  ALIVE {}",
            self.session.playback().generation(),
            self.session.grid.population()
        );
        let status_x = (width - MARGIN - text_pixel_width(&status) * TEXT_SCALE_STATUS).max(MARGIN);
        draw_text(
            &mut self.ui_vertices,
            &status,
            [status_x, 14.0],
            TEXT_SCALE_STATUS,
            TEXT_COLOR,
            window,
        );

        for (index, (label, command)) in BUTTONS.iter().enumerate() {
            let rect = self.button_rect(index);
            let hovered = self.cursor_position.map(|pos| rect.contains(pos)).unwrap_or(false);
            let active = *command == Command::Start && self.session.is_running();
            let color = if hovered {
                BUTTON_HOVER_COLOR
            } else if active {
                BUTTON_ACTIVE_COLOR
            } else {
                BUTTON_COLOR
            };
            push_rect(&mut self.ui_vertices, rect, color, window);

            let text_width = text_pixel_width(label) * TEXT_SCALE_BUTTON;
            let text_height = FONT_HEIGHT as f32 * TEXT_SCALE_BUTTON;
            let origin_x = rect.min[0] + (rect.max[0] - rect.min[0] - text_width) * 0.5;
            let origin_y = rect.min[1] + (rect.max[1] - rect.min[1] - text_height) * 0.5;
            draw_text(
                &mut self.ui_vertices,
                label,
                [origin_x, origin_y],
                TEXT_SCALE_BUTTON,
                TEXT_COLOR,
                window,
            );
        }

        (&self.instances, &self.ui_vertices)
    }
}

/// Drawable height below the control strip.
fn board_height(size: PhysicalSize<u32>) -> u32 {
    size.height.saturating_sub(UI_HEIGHT as u32)
}

fn push_rect(vertices: &mut Vec<Vertex>, rect: Rect, color: [f32; 3], window_size: [f32; 2]) {
    let [width, height] = window_size;
    let x0 = to_ndc(rect.min[0], width);
    let y0 = to_ndc_y(rect.min[1], height);
    let x1 = to_ndc(rect.max[0], width);
    let y1 = to_ndc_y(rect.max[1], height);

    vertices.push(Vertex { position: [x0, y1], color });
    vertices.push(Vertex { position: [x1, y1], color });
    vertices.push(Vertex { position: [x0, y0], color });
    vertices.push(Vertex { position: [x0, y0], color });
    vertices.push(Vertex { position: [x1, y1], color });
    vertices.push(Vertex { position: [x1, y0], color });
}

fn to_ndc(x: f32, width: f32) -> f32 {
    (x / width) * 2.0 - 1.0
}

fn to_ndc_y(y: f32, height: f32) -> f32 {
    1.0 - (y / height) * 2.0
}

fn text_pixel_width(text: &str) -> f32 {
    let mut units = 0.0;
    for ch in text.chars() {
        if ch == ' ' || glyph_bits(ch).is_some() {
            units += (FONT_WIDTH as f32) + 1.0;
        }
    }
    (units - 1.0).max(0.0)
}

fn draw_text(vertices: &mut Vec<Vertex>, text: &str, origin: [f32; 2], scale: f32, color: [f32; 3], window_size: [f32; 2]) {
    let mut cursor_x = origin[0];
    for ch in text.to_uppercase().chars() {
        if ch == ' ' {
            cursor_x += (FONT_WIDTH as f32 + 1.0) * scale;
            continue;
        }
        if let Some(rows) = glyph_bits(ch) {
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..FONT_WIDTH {
                    if (bits >> (FONT_WIDTH - 1 - col)) & 1 == 1 {
                        let rect = Rect {
                            min: [cursor_x + col as f32 * scale, origin[1] + row as f32 * scale],
                            max: [cursor_x + (col as f32 + 1.0) * scale, origin[1] + (row as f32 + 1.0) * scale],
                        };
                        push_rect(vertices, rect, color, window_size);
                    }
                }
            }
        }
        cursor_x += (FONT_WIDTH as f32 + 1.0) * scale;
    }
}

fn glyph_bits(ch: char) -> Option<[u8; FONT_HEIGHT]> {
    match ch {
        'A' => Some([0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001]),
        'C' => Some([0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        'D' => Some([0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110]),
        'E' => Some([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111]),
        'F' => Some([0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        'G' => Some([0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111]),
        'I' => Some([0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111]),
        'L' => Some([0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        'M' => Some([0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
        'N' => Some([0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001]),
        'O' => Some([0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        'P' => Some([0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000]),
        'R' => Some([0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001]),
        'S' => Some([0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        'T' => Some([0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        'V' => Some([0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100]),
        'W' => Some([0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
        '0' => Some([0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110]),
        '1' => Some([0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
        '2' => Some([0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111]),
        '3' => Some([0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110]),
        '4' => Some([0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010]),
        '5' => Some([0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110]),
        '6' => Some([0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110]),
        '7' => Some([0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000]),
        '8' => Some([0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
        '9' => Some([0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100]),
        _ => None,
    }
}

fn key_matches(event: &KeyEvent, target: &str) -> bool {
    match &event.logical_key {
        Key::Named(NamedKey::Space) => target.eq_ignore_ascii_case("SPACE"),
        Key::Character(text) => text.eq_ignore_ascii_case(target),
        _ => false,
    }
}

struct VulkanApp {
    window_attrs: WindowAttributes,
    window: Option<Arc<Window>>,
    window_id: Option<WindowId>,
    state: Option<State>,
    app: Option<LifeApp>,
    last_cursor: [f32; 2],
    frame_count: u32,
    last_fps_log: Instant,
}

impl VulkanApp {
    fn new() -> Self {
        let attrs = Window::default_attributes()
            .with_title("Game of Life - Vulkan")
            .with_inner_size(PhysicalSize::new(1280, 720));
        Self {
            window_attrs: attrs,
            window: None,
            window_id: None,
            state: None,
            app: None,
            last_cursor: [0.0, 0.0],
            frame_count: 0,
            last_fps_log: Instant::now(),
        }
    }
}

impl ApplicationHandler<()> for VulkanApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window = event_loop.create_window(self.window_attrs.clone()).expect("failed to create window");
        let window = Arc::new(window);
        let window_id = window.id();

        let app = LifeApp::new(window.inner_size());
        let state = pollster::block_on(State::new(window.clone(), app.cell_count()))
            .expect("failed to create GPU state");
        window.request_redraw();

        self.window = Some(window);
        self.window_id = Some(window_id);
        self.state = Some(state);
        self.app = Some(app);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if Some(window_id) != self.window_id {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_mut() {
                    state.resize(size);
                }
                if let Some(app) = self.app.as_mut() {
                    app.resize(size);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::ScaleFactorChanged { mut inner_size_writer, .. } => {
                if let Some(state) = self.state.as_ref() {
                    let size = PhysicalSize::new(state.config.width, state.config.height);
                    let _ = inner_size_writer.request_inner_size(size);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.last_cursor = [position.x as f32, position.y as f32];
                if let Some(app) = self.app.as_mut() {
                    app.pointer_moved(self.last_cursor);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    if let Some(app) = self.app.as_mut() {
                        match state {
                            ElementState::Pressed => app.pointer_pressed(self.last_cursor, Instant::now()),
                            ElementState::Released => app.pointer_released(),
                        }
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let Some(app) = self.app.as_mut() {
                        let now = Instant::now();
                        if key_matches(&event, "SPACE") {
                            let command = if app.session.is_running() { Command::Stop } else { Command::Start };
                            app.apply(command, now);
                        } else if key_matches(&event, "R") {
                            app.apply(Command::Randomize, now);
                        } else if key_matches(&event, "C") {
                            app.apply(Command::Clear, now);
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let (Some(state), Some(app)) = (self.state.as_mut(), self.app.as_mut()) {
                    app.update(Instant::now());
                    let (instances, ui_vertices) = app.build_frame();
                    if let Err(err) = state.render(instances, ui_vertices) {
                        match err {
                            wgpu::SurfaceError::Lost => state.resize(state.size),
                            wgpu::SurfaceError::OutOfMemory => event_loop.exit(),
                            _ => log::warn!("surface error: {err:?}"),
                        }
                    } else {
                        self.frame_count += 1;
                        let elapsed = self.last_fps_log.elapsed();
                        if elapsed >= Duration::from_secs(1) {
                            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
                            log::info!("fps: {:.1}", fps);
                            self.frame_count = 0;
                            self.last_fps_log = Instant::now();
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::Poll);
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let event_loop = EventLoop::new()?;
    let mut app = VulkanApp::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}
