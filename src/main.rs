use std::path::Path;

use clap::Parser;
use env_logger::Env;
use log::{debug, info, trace};

use surfplot::camera::{OrbitCamera, OrbitCameraController};
use surfplot::config::{Args, Config};
use surfplot::controls::{Action, Controls};
use surfplot::plotter::{PlotEvent, Plotter};
use surfplot::projection::Projection;
use surfplot::render::Renderer;
use surfplot::window::{FrameLimiter, InputState, Window, WindowEvent};
use surfplot::Error;

const TITLE: &str = "surfplot";

/// Window title describing the displayed plot.
fn status_line(plotter: &Plotter) -> String {
    let params = plotter.params();
    format!(
        "{TITLE}: z = {} | n = {} | incr = {}",
        plotter.expression().unwrap_or("?"),
        params.half_width,
        params.step
    )
}

fn setup(config: &Config) -> Result<Plotter, Error> {
    let mut plotter = Plotter::new(config.params)?;
    plotter.handle(PlotEvent::GroundColorChanged(config.ground_color))?;
    if let Some(offset) = config.ground_offset {
        plotter.handle(PlotEvent::GroundOffsetChanged(offset))?;
    }
    plotter.scene_mut().render_mode = config.render_mode;
    plotter.plot(&config.expression, config.params)?;
    Ok(plotter)
}

fn render_to_file(config: &Config, plotter: &Plotter, path: &Path) -> Result<(), Error> {
    let mut renderer = Renderer::new(config.width, config.height);
    let camera = OrbitCamera::for_half_width(plotter.params().half_width);
    let projection = Projection::for_viewport(config.width, config.height);
    let stats = renderer.render(plotter.scene(), &camera, &projection);
    renderer.framebuffer().save(path)?;
    info!(
        "wrote {} ({} triangles drawn)",
        path.display(),
        stats.triangles
    );
    Ok(())
}

fn run_window(config: &Config, mut plotter: Plotter) -> Result<(), Error> {
    let mut window = Window::new(TITLE, config.width, config.height)?;
    let mut renderer = Renderer::new(config.width, config.height);
    let mut projection = Projection::for_viewport(config.width, config.height);
    let mut camera = OrbitCamera::for_half_width(plotter.params().half_width);
    let camera_controller = OrbitCameraController::default();
    let mut controls = Controls::new();
    let mut input = InputState::default();
    let mut frame_limiter = FrameLimiter::new(&window);

    let mut status = status_line(&plotter);
    let mut title = String::new();
    let mut text_input = false;

    'running: loop {
        let events = window.poll_events(&mut input);
        camera_controller.update(&mut camera, &input);

        for event in &events {
            if let WindowEvent::Resize(width, height) = *event {
                window.resize(width, height)?;
                renderer.resize(width, height);
                projection.set_viewport(width, height);
            }

            match controls.handle(event, &plotter) {
                Some(Action::Quit) => break 'running,
                Some(Action::CycleRenderMode) => {
                    let scene = plotter.scene_mut();
                    scene.render_mode = scene.render_mode.next();
                    info!("render mode: {:?}", scene.render_mode);
                }
                Some(Action::ToggleAxes) => {
                    let scene = plotter.scene_mut();
                    scene.show_axes = !scene.show_axes;
                }
                Some(Action::Plot(plot_event)) => {
                    let half_width = plotter.params().half_width;
                    match plotter.handle(plot_event) {
                        Ok(_) => {
                            if plotter.params().half_width != half_width {
                                camera.frame(plotter.params().half_width);
                            }
                            status = status_line(&plotter);
                        }
                        Err(err) => status = format!("{TITLE}: {err}"),
                    }
                }
                None => {}
            }
        }

        if controls.is_editing() != text_input {
            text_input = controls.is_editing();
            window.set_text_input(text_input);
        }

        let wanted = if controls.is_editing() {
            format!("{TITLE}: z = {}_", controls.buffer())
        } else {
            status.clone()
        };
        if wanted != title {
            window.set_title(&wanted)?;
            title = wanted;
        }

        renderer.render(plotter.scene(), &camera, &projection);
        window.present(renderer.framebuffer().as_bytes())?;

        let delta = frame_limiter.wait_and_get_delta(&window);
        trace!("frame time {delta} ms");
    }

    debug!("window closed");
    Ok(())
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;
    let plotter = setup(&config)?;

    match &config.output {
        Some(path) => render_to_file(&config, &plotter, path),
        None => run_window(&config, plotter),
    }
}
