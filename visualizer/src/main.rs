use greencore::profile::{
    group_thousands, AlgorithmId, ArraySize, CODE_SAMPLES, DEMO_STEPS, LEARNING_POINTS, PROFILES,
};
use greencore::simulation::Efficiency;
use greencore::Metrics;
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, pick_list, row, scrollable, text, Column, Container, Row,
    },
    Alignment, Color, Element, Font, Length, Point, Rectangle, Renderer, Size, Subscription, Task,
    Theme,
};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:9000";

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Green Computing: Live Energy Monitor".into()
}

fn application_subscription(state: &Visualizer) -> Subscription<Message> {
    let period = if state.is_running() {
        Duration::from_millis(100)
    } else {
        Duration::from_secs(1)
    };
    time::every(period).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Light
}

fn bridge_url() -> String {
    std::env::var("GREEN_BRIDGE_URL").unwrap_or_else(|_| DEFAULT_BRIDGE_URL.into())
}

#[derive(Debug)]
struct Visualizer {
    payload: Option<VisualizationPayload>,
    awaiting_run: bool,
    status: String,
    activity: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    StateFetched(Result<VisualizationPayload, String>),
    AlgorithmSelected(AlgorithmId),
    ArraySizeSelected(ArraySize),
    SelectionSubmitted(Result<bool, String>),
    RunTest,
    RunSubmitted(Result<bool, String>),
    ClearResults,
    Cleared(Result<(), String>),
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                payload: None,
                awaiting_run: false,
                status: "Waiting for the simulator bridge...".into(),
                activity: Vec::new(),
            },
            Task::perform(fetch_state(), Message::StateFetched),
        )
    }

    fn is_running(&self) -> bool {
        self.awaiting_run || self.payload.as_ref().is_some_and(|payload| payload.running)
    }

    /// The bridge driver's selection, or the defaults before the first fetch.
    fn selection(&self) -> (AlgorithmId, ArraySize) {
        self.payload
            .as_ref()
            .map(|payload| (payload.algorithm, payload.array_size))
            .unwrap_or_default()
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_state(), Message::StateFetched),
            Message::StateFetched(Ok(payload)) => {
                if let (Some(previous), Some(latest)) =
                    (state.payload.as_ref(), payload.history.last())
                {
                    if previous.counters.completed < payload.counters.completed {
                        state.push_activity(format!(
                            "{} on {} elements: {}",
                            latest.algorithm_name,
                            group_thousands(latest.array_size as u64),
                            latest.efficiency_label()
                        ));
                    }
                }
                state.status = if payload.running {
                    format!("Tick {}/{}", payload.tick, payload.total_ticks)
                } else {
                    "Ready".into()
                };
                state.payload = Some(payload);
                Task::none()
            }
            Message::StateFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::AlgorithmSelected(algorithm) => {
                if state.is_running() {
                    return Task::none();
                }
                if let Some(payload) = state.payload.as_mut() {
                    payload.algorithm = algorithm;
                }
                Task::perform(
                    post_select(json!({"algorithm": algorithm.as_str()})),
                    Message::SelectionSubmitted,
                )
            }
            Message::ArraySizeSelected(size) => {
                if state.is_running() {
                    return Task::none();
                }
                if let Some(payload) = state.payload.as_mut() {
                    payload.array_size = size;
                }
                Task::perform(
                    post_select(json!({"array_size": size.get()})),
                    Message::SelectionSubmitted,
                )
            }
            Message::SelectionSubmitted(result) => {
                if let Err(err) = result {
                    state.status = format!("Selection error: {err}");
                }
                Task::perform(fetch_state(), Message::StateFetched)
            }
            Message::RunTest => {
                if state.is_running() {
                    return Task::none();
                }
                state.awaiting_run = true;
                Task::perform(post_start(), Message::RunSubmitted)
            }
            Message::RunSubmitted(Ok(started)) => {
                state.awaiting_run = false;
                if started {
                    let (algorithm, array_size) = state.selection();
                    state.push_activity(format!(
                        "Started {} on {}",
                        algorithm.profile().display_name,
                        array_size
                    ));
                }
                Task::perform(fetch_state(), Message::StateFetched)
            }
            Message::RunSubmitted(Err(err)) => {
                state.awaiting_run = false;
                state.status = format!("Run error: {err}");
                Task::none()
            }
            Message::ClearResults => Task::perform(post_clear(), Message::Cleared),
            Message::Cleared(Ok(())) => {
                state.push_activity("Results cleared".into());
                Task::perform(fetch_state(), Message::StateFetched)
            }
            Message::Cleared(Err(err)) => {
                state.status = format!("Clear error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let running = state.is_running();
        let (algorithm, array_size) = state.selection();
        let profile = algorithm.profile();
        let metrics = state
            .payload
            .as_ref()
            .map(|payload| payload.metrics)
            .unwrap_or_default();
        let history = state
            .payload
            .as_ref()
            .map(|payload| payload.history.clone())
            .unwrap_or_default();

        let header = column![
            text("Green Computing: Live Energy Monitor").size(32),
            text("Measuring the environmental impact of different algorithms").size(16),
        ]
        .spacing(4)
        .align_x(Alignment::Center);

        let algorithm_control: Element<'_, Message> = if running {
            text(algorithm.to_string()).size(14).into()
        } else {
            pick_list(
                AlgorithmId::ALL,
                Some(algorithm),
                Message::AlgorithmSelected,
            )
            .into()
        };
        let size_control: Element<'_, Message> = if running {
            text(array_size.to_string()).size(14).into()
        } else {
            pick_list(
                ArraySize::OPTIONS,
                Some(array_size),
                Message::ArraySizeSelected,
            )
            .into()
        };
        let action_label = if running { "Running..." } else { "Run Test" };
        let run_button = button(text(action_label))
            .on_press_maybe((!running).then_some(Message::RunTest))
            .padding(10);

        let (r, g, b) = profile.color.rgb();
        let control_panel = column![
            text("Algorithm Testing Lab").size(24),
            row![
                column![text("Choose Algorithm").size(13), algorithm_control].spacing(6),
                column![text("Array Size").size(13), size_control].spacing(6),
                run_button,
            ]
            .spacing(20)
            .align_y(Alignment::End),
            row![
                text("Current Algorithm: ").size(15),
                text(profile.display_name)
                    .size(15)
                    .color(Color::from_rgb(r, g, b)),
            ],
            text(format!(
                "Time Complexity: {} | Testing with {} elements",
                profile.complexity,
                group_thousands(array_size.get() as u64)
            ))
            .size(13),
        ]
        .spacing(12)
        .padding(16);

        let display = metrics.display();
        let cards = row![
            metric_card("Execution Time", display.card_time(), "milliseconds of processing"),
            metric_card("CPU Cycles", display.card_cycles(), "million cycles used"),
            metric_card("Energy Used", display.card_energy(), "millijoules consumed"),
            metric_card("Carbon Footprint", display.card_carbon(), "micrograms CO₂"),
        ]
        .spacing(16);

        let results_header = row![
            text("Algorithm Comparison Results").size(24).width(Length::Fill),
            button("Clear Results")
                .on_press(Message::ClearResults)
                .padding(8),
        ]
        .align_y(Alignment::Center);

        let results_body: Element<'_, Message> = if history.is_empty() {
            text("Run some algorithms to see comparison results")
                .size(14)
                .into()
        } else {
            let table = history.iter().fold(
                Column::new().spacing(6).push(table_row([
                    "Algorithm".to_string(),
                    "Array Size".to_string(),
                    "Time (s)".to_string(),
                    "Energy (mJ)".to_string(),
                    "CO₂ (μg)".to_string(),
                    "Efficiency".to_string(),
                ])),
                |col, entry| {
                    let cells = entry.metrics.display();
                    col.push(table_row([
                        entry.algorithm_name.clone(),
                        group_thousands(entry.array_size as u64),
                        cells.seconds,
                        cells.millijoules,
                        cells.micrograms,
                        entry.efficiency_label().to_string(),
                    ]))
                },
            );
            let chart = Canvas::new(HistoryChart::new(&history))
                .width(Length::Fill)
                .height(Length::Fixed(180.0));
            column![table, text("Energy per run (mJ)").size(14), chart]
                .spacing(12)
                .into()
        };

        let impact_panel = PROFILES.iter().fold(Row::new().spacing(16), |row, profile| {
            let (r, g, b) = profile.color.rgb();
            row.push(
                Container::new(
                    column![
                        text(format!("{} Impact", profile.display_name))
                            .size(16)
                            .color(Color::from_rgb(r, g, b)),
                        text(format!("Energy: {}", profile.impact.energy)).size(13),
                        text(format!("CO₂: {}", profile.impact.co2)).size(13),
                        text(format!("Cost: {}", profile.impact.cost)).size(13),
                        text(format!("Scalability: {}", profile.impact.scalability)).size(13),
                    ]
                    .spacing(4),
                )
                .padding(12)
                .width(Length::FillPortion(1)),
            )
        });

        let code_panels = CODE_SAMPLES.iter().fold(Row::new().spacing(16), |row, sample| {
            let accent = if sample.efficient {
                Color::from_rgb(0.09, 0.64, 0.29)
            } else {
                Color::from_rgb(0.86, 0.15, 0.15)
            };
            let notes = sample
                .notes
                .iter()
                .fold(Column::new().spacing(2), |col, note| {
                    col.push(text(format!("- {note}")).size(12))
                });
            row.push(
                Container::new(
                    column![
                        text(sample.heading).size(18).color(accent),
                        text(sample.title).size(13),
                        text(sample.source).size(12).font(Font::MONOSPACE),
                        text(if sample.efficient {
                            "Energy Benefits:"
                        } else {
                            "Energy Impact:"
                        })
                        .size(13),
                        notes,
                    ]
                    .spacing(6),
                )
                .padding(12)
                .width(Length::FillPortion(1)),
            )
        });

        let learning_panel = LEARNING_POINTS.iter().fold(Row::new().spacing(16), |row, points| {
            let items = points
                .items
                .iter()
                .fold(Column::new().spacing(2), |col, item| {
                    col.push(text(format!("- {item}")).size(13))
                });
            row.push(
                column![text(format!("{}:", points.heading)).size(16), items]
                    .spacing(6)
                    .width(Length::FillPortion(1)),
            )
        });

        let demo_steps = DEMO_STEPS.iter().enumerate().fold(
            Column::new().spacing(2).push(text("Try This Live Demo:").size(16)),
            |col, (index, step)| col.push(text(format!("{}. {}", index + 1, step)).size(13)),
        );

        let activity_list = if state.activity.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .activity
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let layout = column![
            header,
            control_panel,
            cards,
            results_header,
            results_body,
            text("Environmental Impact Analysis").size(24),
            impact_panel,
            code_panels,
            text("Key Learning Points").size(24),
            learning_panel,
            demo_steps,
            text(&state.status).size(13),
            Container::new(scrollable(activity_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(18)
        .padding(24)
        .width(Length::Fill);

        Container::new(scrollable(layout))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_activity(&mut self, entry: String) {
        self.activity.push(entry);
        if self.activity.len() > 20 {
            self.activity.remove(0);
        }
    }
}

fn metric_card<'a>(title: &'a str, value: String, caption: &'a str) -> Element<'a, Message> {
    Container::new(
        column![
            text(title).size(13),
            text(value).size(24),
            text(caption).size(11),
        ]
        .spacing(6),
    )
    .padding(16)
    .width(Length::FillPortion(1))
    .into()
}

fn table_row<'a>(cells: [String; 6]) -> Element<'a, Message> {
    cells
        .into_iter()
        .fold(Row::new().spacing(8), |row, cell| {
            row.push(text(cell).size(13).width(Length::Fixed(130.0)))
        })
        .into()
}

async fn fetch_state() -> Result<VisualizationPayload, String> {
    let response = reqwest::get(format!("{}/state", bridge_url()))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<VisualizationPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_command(path: &str, body: serde_json::Value) -> Result<CommandResponse, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/{}", bridge_url(), path))
        .json(&body)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = response.status();
    let body = response
        .json::<CommandResponse>()
        .await
        .map_err(|e| e.to_string())?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(format!("{}: {}", status, body.message))
    }
}

async fn post_select(selection: serde_json::Value) -> Result<bool, String> {
    post_command("select", selection)
        .await
        .map(|body| body.applied)
}

async fn post_start() -> Result<bool, String> {
    post_command("start", json!({})).await.map(|body| body.started)
}

async fn post_clear() -> Result<(), String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/clear", bridge_url()))
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok(())
    } else {
        Err(response.status().to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CommandResponse {
    #[serde(default)]
    started: bool,
    #[serde(default)]
    applied: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct Counters {
    #[serde(default)]
    completed: usize,
}

#[derive(Debug, Clone, Deserialize)]
struct VisualizationPayload {
    #[serde(default)]
    algorithm: AlgorithmId,
    #[serde(default)]
    array_size: ArraySize,
    #[serde(default)]
    running: bool,
    #[serde(default)]
    tick: u32,
    #[serde(default)]
    total_ticks: u32,
    #[serde(default)]
    metrics: Metrics,
    #[serde(default)]
    history: Vec<HistoryEntry>,
    #[serde(default)]
    counters: Counters,
}

#[derive(Debug, Clone, Deserialize)]
struct HistoryEntry {
    algorithm: AlgorithmId,
    algorithm_name: String,
    array_size: u32,
    metrics: Metrics,
    efficiency: Efficiency,
}

impl HistoryEntry {
    fn efficiency_label(&self) -> &'static str {
        self.efficiency.label()
    }
}

/// Bar per history entry, height proportional to energy, coloured by profile.
#[derive(Clone)]
struct HistoryChart {
    bars: Vec<(f32, Color)>,
}

impl HistoryChart {
    fn new(entries: &[HistoryEntry]) -> Self {
        Self {
            bars: entries
                .iter()
                .map(|entry| {
                    let (r, g, b) = entry.algorithm.profile().color.rgb();
                    (
                        (entry.metrics.energy_joules * 1000.0) as f32,
                        Color::from_rgb(r, g, b),
                    )
                })
                .collect(),
        }
    }
}

impl canvas::Program<Message> for HistoryChart {
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
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.96, 0.97, 0.96),
        );

        if !self.bars.is_empty() {
            let max = self
                .bars
                .iter()
                .map(|(value, _)| *value)
                .fold(0.0, f32::max)
                .max(f32::EPSILON);
            let slot = bounds.width / self.bars.len() as f32;
            let bar_width = slot * 0.6;

            for (index, (value, color)) in self.bars.iter().enumerate() {
                let height = (value / max) * (bounds.height - 12.0);
                let x = index as f32 * slot + (slot - bar_width) / 2.0;
                let y = bounds.height - height;
                frame.fill_rectangle(Point::new(x, y), Size::new(bar_width, height), *color);
            }

            let baseline = Path::line(
                Point::new(0.0, bounds.height - 1.0),
                Point::new(bounds.width, bounds.height - 1.0),
            );
            frame.stroke(
                &baseline,
                Stroke::default()
                    .with_width(1.5)
                    .with_color(Color::from_rgb(0.4, 0.4, 0.45)),
            );
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_payload() -> VisualizationPayload {
        serde_json::from_value(json!({
            "algorithm": "quick",
            "array_size": 5000,
            "running": true,
            "tick": 12,
            "total_ticks": 50,
            "metrics": {
                "execution_time": 24.0,
                "cpu_cycles": 6.72e10,
                "energy_joules": 0.2352,
                "carbon_grams": 9.408e-5
            },
            "history": [],
            "counters": {"started": 1, "completed": 0, "cancelled": 0, "ticks": 12}
        }))
        .unwrap()
    }

    #[test]
    fn payload_parses_bridge_model() {
        let payload: VisualizationPayload = serde_json::from_value(json!({
            "algorithm": "bubble",
            "array_size": 1000,
            "running": false,
            "tick": 50,
            "total_ticks": 50,
            "action_label": "Run Test",
            "metrics": {
                "execution_time": 100.0,
                "cpu_cycles": 2.8e11,
                "energy_joules": 0.98,
                "carbon_grams": 3.92e-4
            },
            "history": [{
                "algorithm": "bubble",
                "algorithm_name": "Bubble Sort",
                "array_size": 1000,
                "metrics": {
                    "execution_time": 100.0,
                    "cpu_cycles": 2.8e11,
                    "energy_joules": 0.98,
                    "carbon_grams": 3.92e-4
                },
                "efficiency": "efficient"
            }],
            "counters": {"started": 1, "completed": 1, "cancelled": 0, "ticks": 50}
        }))
        .unwrap();
        assert_eq!(payload.history.len(), 1);
        assert_eq!(payload.history[0].efficiency_label(), "Efficient");
        assert_eq!(payload.counters.completed, 1);
        assert_eq!(payload.algorithm, AlgorithmId::Bubble);
        assert_eq!(payload.array_size.get(), 1000);
    }

    #[test]
    fn selection_is_ignored_while_running() {
        let (mut state, _) = Visualizer::boot();
        state.payload = Some(running_payload());
        let _ = Visualizer::update(&mut state, Message::AlgorithmSelected(AlgorithmId::Bubble));
        let _ = Visualizer::update(
            &mut state,
            Message::ArraySizeSelected(ArraySize::OPTIONS[3]),
        );
        let (algorithm, array_size) = state.selection();
        assert_eq!(algorithm, AlgorithmId::Quick);
        assert_eq!(array_size.get(), 5000);
    }

    #[test]
    fn selection_follows_fetched_payload() {
        let (mut state, _) = Visualizer::boot();
        assert_eq!(state.selection(), (AlgorithmId::Bubble, ArraySize::default()));
        let _ = Visualizer::update(&mut state, Message::StateFetched(Ok(running_payload())));
        assert_eq!(state.selection().0, AlgorithmId::Quick);
        assert_eq!(state.status, "Tick 12/50");
    }

    #[test]
    fn idle_selection_updates_payload_until_next_fetch() {
        let (mut state, _) = Visualizer::boot();
        let mut idle = running_payload();
        idle.running = false;
        state.payload = Some(idle);
        let _ = Visualizer::update(&mut state, Message::AlgorithmSelected(AlgorithmId::Optimized));
        let _ = Visualizer::update(
            &mut state,
            Message::ArraySizeSelected(ArraySize::OPTIONS[0]),
        );
        let (algorithm, array_size) = state.selection();
        assert_eq!(algorithm, AlgorithmId::Optimized);
        assert_eq!(array_size.get(), 500);
    }

    #[test]
    fn run_test_waits_for_bridge_reply() {
        let (mut state, _) = Visualizer::boot();
        let _ = Visualizer::update(&mut state, Message::RunTest);
        assert!(state.is_running());
        let _ = Visualizer::update(&mut state, Message::RunSubmitted(Ok(false)));
        assert!(!state.is_running());
        assert!(state.activity.is_empty());
    }

    #[test]
    fn activity_log_is_bounded() {
        let (mut state, _) = Visualizer::boot();
        for index in 0..25 {
            state.push_activity(format!("entry {index}"));
        }
        assert_eq!(state.activity.len(), 20);
        assert_eq!(state.activity[0], "entry 5");
    }
}
