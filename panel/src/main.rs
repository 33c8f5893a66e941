use anyhow::Context;
use clap::Parser;
use fooscore::config::PanelConfig;
use fooscore::panel::{CommandDispatcher, PanelEffect, PanelEvent, PanelState};
use fooscore::poller::{CoordinateClient, CoordinatePoller};
use fooscore::projection::{OverlayProjector, PixelOffset};
use fooscore::table::{CommandKind, Coordinate};
use fooscore::telemetry::{FeedMetrics, TraceLog};
use fooscore::BackendResult;
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, mouse_area, row, scrollable, text, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Builder as TokioBuilder;

#[derive(Parser)]
#[command(author, version, about = "Operator control panel for the robo-foosball table")]
struct Args {
    /// Load panel settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the configured backend base URL
    #[arg(long)]
    base_url: Option<String>,
    /// Poll the coordinate feed for N updates and exit without a window
    #[arg(long)]
    probe: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = load_config(args.config.as_ref())?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }

    if let Some(updates) = args.probe {
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for the feed probe")?;
        return runtime.block_on(probe_feed(config, updates));
    }

    run_panel(config).context("running the control panel")
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<PanelConfig> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading panel config {}", path.display()))?;
            serde_yaml::from_str(&contents)
                .with_context(|| format!("parsing panel config {}", path.display()))
        }
        None => Ok(PanelConfig::default()),
    }
}

fn run_panel(config: PanelConfig) -> iced::Result {
    iced::application(
        move || Panel::boot(config.clone()),
        Panel::update,
        Panel::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .run()
}

/// Drives the headless coordinate feed: waits for up to `updates` published
/// values and prints them, then reports the poll counters.
async fn probe_feed(config: PanelConfig, updates: u64) -> anyhow::Result<()> {
    let interval = config.poll_interval();
    let client = CoordinateClient::new(config.base_url.as_str());
    println!("Probing {} every {:?}", client.endpoint(), interval);

    let poller = CoordinatePoller::new(Arc::new(client), interval);
    let metrics = poller.metrics();
    let mut handle = poller.spawn();

    for _ in 0..updates {
        match tokio::time::timeout(interval * 2, handle.changed()).await {
            Ok(true) => {
                let feed = handle.latest();
                println!(
                    "feed {} -> ({:.1}, {:.1})",
                    feed.seq, feed.coordinate.x, feed.coordinate.y
                );
            }
            Ok(false) => break,
            Err(_) => println!("feed silent, keeping last value"),
        }
    }

    handle.shutdown();
    let snapshot = metrics.snapshot();
    println!(
        "Probe finished -> {} ok / {} failed",
        snapshot.polls_ok, snapshot.polls_failed
    );
    Ok(())
}

fn application_title(_: &Panel) -> String {
    "Robo-Foosball Control Panel".into()
}

fn application_subscription(state: &Panel) -> Subscription<Message> {
    time::every(state.poll_interval).map(|_| Message::Tick)
}

fn application_theme(_: &Panel) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Panel {
    state: PanelState,
    projector: OverlayProjector,
    poll_interval: Duration,
    client: CoordinateClient,
    dispatcher: CommandDispatcher,
    metrics: Arc<FeedMetrics>,
    trace: TraceLog,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    PollSettled {
        seq: u64,
        result: BackendResult<Coordinate>,
    },
    CommandPressed(CommandKind),
    CommandSettled {
        kind: CommandKind,
        result: BackendResult<()>,
    },
    ProbeMoved(Point),
    ProbeLeft,
}

impl Panel {
    fn boot(config: PanelConfig) -> (Self, Task<Message>) {
        let metrics = Arc::new(FeedMetrics::new());
        let client = CoordinateClient::new(config.base_url.as_str());
        let dispatcher = CommandDispatcher::with_metrics(
            config.base_url.clone(),
            config.hardware_type.clone(),
            Arc::clone(&metrics),
        );
        let mut panel = Panel {
            state: PanelState::default(),
            projector: config.projector(),
            poll_interval: config.poll_interval(),
            client,
            dispatcher,
            metrics,
            trace: TraceLog::new(),
        };
        let first_poll = panel.run_event(PanelEvent::TickElapsed);
        (panel, first_poll)
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => state.run_event(PanelEvent::TickElapsed),
            Message::PollSettled { seq, result } => {
                match &result {
                    Ok(coordinate) => {
                        state.metrics.record_poll_ok();
                        state.trace.poll_applied(seq, *coordinate);
                    }
                    Err(error) => {
                        state.metrics.record_poll_failed();
                        state.trace.poll_failed(seq, error);
                    }
                }
                state.run_event(PanelEvent::PollSettled { seq, result })
            }
            Message::CommandPressed(kind) => state.run_event(PanelEvent::CommandPressed(kind)),
            Message::CommandSettled { kind, result } => {
                state.run_event(PanelEvent::CommandSettled { kind, result })
            }
            Message::ProbeMoved(point) => {
                let table = state
                    .projector
                    .table_from_pointer(f64::from(point.x), f64::from(point.y));
                state.run_event(PanelEvent::ProbeMoved(table))
            }
            Message::ProbeLeft => state.run_event(PanelEvent::ProbeLeft),
        }
    }

    /// Feeds one event through the reducer and turns the requested effect
    /// into a task. The reducer is the only place panel state changes.
    fn run_event(&mut self, event: PanelEvent) -> Task<Message> {
        let was_tick = matches!(event, PanelEvent::TickElapsed);
        match self.state.apply(event) {
            Some(PanelEffect::StartPoll { seq }) => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.fetch_coordinate().await },
                    move |result| Message::PollSettled { seq, result },
                )
            }
            Some(PanelEffect::Dispatch(kind)) => {
                let dispatcher = self.dispatcher.clone();
                Task::perform(
                    async move { dispatcher.dispatch(kind).await },
                    move |result| Message::CommandSettled { kind, result },
                )
            }
            None => {
                if was_tick {
                    self.metrics.record_tick_skipped();
                    if let Some(seq) = self.state.pending_poll() {
                        self.trace.tick_skipped(seq);
                    }
                }
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let coordinate = state.state.coordinate;
        let pixel = state.projector.project(coordinate);
        let mm = state.projector.to_millimeters(coordinate);
        let geometry = state.projector.geometry();

        let history_list = if state.state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let controls = column![
            text("Table Controls").size(26),
            command_button(CommandKind::PowerOn, state.state.power_on),
            command_button(CommandKind::Start, state.state.start_pressed),
            command_button(CommandKind::Reset, state.state.reset_pressed),
            command_button(CommandKind::Stop, state.state.stop_pressed),
            text(&state.state.status).size(14),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(170.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(280.0));

        let field_canvas = Canvas::new(FieldCanvas {
            marker: pixel,
            probe: state
                .state
                .probe
                .map(|probe| PixelOffset::new(probe.x, probe.y)),
            marker_radius: state.projector.marker_radius() as f32,
        })
        .width(Length::Fixed(geometry.width as f32))
        .height(Length::Fixed(geometry.height as f32));

        let probe_line = match state.state.probe {
            Some(probe) => text(format!("Probe at ({:.0}, {:.0})", probe.x, probe.y)).size(14),
            None => text("Probe idle").size(14),
        };

        let counters = state.metrics.snapshot();

        let field_column = column![
            text("Field").size(26),
            mouse_area(field_canvas)
                .on_move(Message::ProbeMoved)
                .on_exit(Message::ProbeLeft),
            text(format!(
                "Coordinates of Ball: [ {:.1} , {:.1} ]",
                coordinate.x, coordinate.y
            ))
            .size(18),
            text(format!(
                "Ball Pixel ({:.0}, {:.0}) / Ball MM ({:.0}, {:.0})",
                coordinate.x, coordinate.y, mm.x, mm.y
            ))
            .size(14),
            probe_line,
            text(format!(
                "Polls {} ok / {} failed / {} skipped | Commands {} ok / {} failed",
                counters.polls_ok,
                counters.polls_failed,
                counters.ticks_skipped,
                counters.commands_ok,
                counters.commands_failed
            ))
            .size(12),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![controls, field_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}

/// A command button; engaged buttons render with the primary style so the
/// operator can see which flags are latched.
fn command_button(kind: CommandKind, engaged: bool) -> iced::widget::Button<'static, Message> {
    let style: fn(&Theme, button::Status) -> button::Style = if engaged {
        button::primary
    } else {
        button::secondary
    };
    button(text(kind.label()).size(16))
        .on_press(Message::CommandPressed(kind))
        .style(style)
        .padding(10)
        .width(Length::Fill)
}

/// Field backdrop plus the ball marker and the optional probe ring. The
/// marker is drawn wherever the projector says; no clamping.
struct FieldCanvas {
    marker: PixelOffset,
    probe: Option<PixelOffset>,
    marker_radius: f32,
}

impl canvas::Program<Message> for FieldCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::from_rgb(0.07, 0.38, 0.14));

        let lines = Color::from_rgba(1.0, 1.0, 1.0, 0.7);
        let border = Path::new(|builder| {
            builder.move_to(Point::new(1.0, 1.0));
            builder.line_to(Point::new(bounds.width - 1.0, 1.0));
            builder.line_to(Point::new(bounds.width - 1.0, bounds.height - 1.0));
            builder.line_to(Point::new(1.0, bounds.height - 1.0));
            builder.close();
        });
        frame.stroke(&border, Stroke::default().with_width(2.0).with_color(lines));

        let halfway = Path::new(|builder| {
            builder.move_to(Point::new(bounds.width / 2.0, 0.0));
            builder.line_to(Point::new(bounds.width / 2.0, bounds.height));
        });
        frame.stroke(&halfway, Stroke::default().with_width(1.5).with_color(lines));

        let center_mark = Path::new(|builder| {
            builder.circle(Point::new(bounds.width / 2.0, bounds.height / 2.0), 36.0)
        });
        frame.stroke(&center_mark, Stroke::default().with_width(1.5).with_color(lines));

        let ball = Path::new(|builder| {
            builder.circle(
                Point::new(self.marker.left as f32, self.marker.top as f32),
                self.marker_radius,
            )
        });
        frame.fill(&ball, Color::WHITE);

        if let Some(probe) = self.probe {
            let probe_ring = Path::new(|builder| {
                builder.circle(
                    Point::new(probe.left as f32, probe.top as f32),
                    self.marker_radius,
                )
            });
            frame.stroke(
                &probe_ring,
                Stroke::default()
                    .with_width(1.5)
                    .with_color(Color::from_rgb(0.95, 0.85, 0.3)),
            );
        }

        vec![frame.into_geometry()]
    }
}
