use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::Runner;
use anyhow::Context;
use greencore::prelude::lock_driver;
use greencore::profile::{lessons, PROFILES};
use greencore::{AlgorithmId, ArraySize, RunHandle, SharedDriver, SimulationError, TimerService};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

/// Body of `POST /run`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunPayload {
    pub algorithm: String,
    pub array_size: u32,
}

/// Body of `POST /select`. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectPayload {
    pub algorithm: Option<String>,
    pub array_size: Option<u32>,
}

/// Driver owned by the bridge plus the timer of its active run.
pub struct BridgeState {
    driver: SharedDriver,
    timer: TimerService,
    active: Mutex<Option<RunHandle>>,
}

impl BridgeState {
    pub fn new(runner: &Runner) -> Self {
        Self {
            driver: runner.driver(),
            timer: runner.timer(),
            active: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> VisualizationModel {
        VisualizationModel::from(lock_driver(&self.driver).snapshot())
    }

    /// Updates the driver's selection. Returns `false` while a run is active.
    pub fn select(&self, payload: &SelectPayload) -> Result<bool, SimulationError> {
        let algorithm = payload
            .algorithm
            .as_deref()
            .map(str::parse::<AlgorithmId>)
            .transpose()?;
        let array_size = payload.array_size.map(ArraySize::try_from).transpose()?;

        let mut driver = lock_driver(&self.driver);
        if driver.is_running() {
            return Ok(false);
        }
        if let Some(algorithm) = algorithm {
            driver.select_algorithm(algorithm);
        }
        if let Some(array_size) = array_size {
            driver.select_array_size(array_size);
        }
        Ok(true)
    }

    /// Starts a run for raw inputs. `false` when one is already active.
    /// Must be called from within a tokio runtime.
    pub fn run(&self, payload: &RunPayload) -> Result<bool, SimulationError> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| SimulationError::StatePoisoned)?;
        let handle = self
            .timer
            .start(&self.driver, &payload.algorithm, payload.array_size, |_| {})?;
        Ok(Self::track(&mut active, handle))
    }

    /// Starts a run for the driver's current selection.
    pub fn run_selected(&self) -> Result<bool, SimulationError> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| SimulationError::StatePoisoned)?;
        let handle = self.timer.start_selected(&self.driver, |_| {})?;
        Ok(Self::track(&mut active, handle))
    }

    fn track(active: &mut Option<RunHandle>, handle: Option<RunHandle>) -> bool {
        match handle {
            Some(handle) => {
                *active = Some(handle);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        lock_driver(&self.driver).clear();
    }

    /// Cancels the active run, if any.
    pub fn shutdown(&self) {
        if let Ok(mut active) = self.active.lock() {
            if let Some(mut handle) = active.take() {
                handle.cancel();
            }
        }
    }
}

fn with_state(
    state: Arc<BridgeState>,
) -> impl Filter<Extract = (Arc<BridgeState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn error_reply(err: &SimulationError) -> warp::reply::WithStatus<warp::reply::Json> {
    let status = match err {
        SimulationError::StatePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    warp::reply::with_status(
        warp::reply::json(&json!({"status": "error", "message": err.to_string()})),
        status,
    )
}

async fn get_state(state: Arc<BridgeState>) -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&state.snapshot()))
}

async fn get_profiles() -> Result<impl warp::Reply, Infallible> {
    Ok(warp::reply::json(&json!({
        "profiles": PROFILES.as_slice(),
        "array_sizes": ArraySize::OPTIONS,
        "code_samples": lessons::CODE_SAMPLES.as_slice(),
        "learning_points": lessons::LEARNING_POINTS.as_slice(),
        "demo_steps": lessons::DEMO_STEPS.as_slice(),
    })))
}

async fn post_select(
    payload: SelectPayload,
    state: Arc<BridgeState>,
) -> Result<impl warp::Reply, Infallible> {
    Ok(match state.select(&payload) {
        Ok(applied) => warp::reply::with_status(
            warp::reply::json(&json!({"status": "ok", "applied": applied})),
            StatusCode::OK,
        ),
        Err(err) => {
            warn!("rejected selection {:?}: {}", payload, err);
            error_reply(&err)
        }
    })
}

async fn post_start(state: Arc<BridgeState>) -> Result<impl warp::Reply, Infallible> {
    Ok(match state.run_selected() {
        Ok(started) => warp::reply::with_status(
            warp::reply::json(&json!({"status": "running", "started": started})),
            StatusCode::OK,
        ),
        Err(err) => error_reply(&err),
    })
}

async fn post_run(
    payload: RunPayload,
    state: Arc<BridgeState>,
) -> Result<impl warp::Reply, Infallible> {
    Ok(match state.run(&payload) {
        Ok(started) => warp::reply::with_status(
            warp::reply::json(&json!({"status": "running", "started": started})),
            StatusCode::OK,
        ),
        Err(err) => {
            warn!("rejected run request {:?}: {}", payload, err);
            error_reply(&err)
        }
    })
}

async fn post_clear(state: Arc<BridgeState>) -> Result<impl warp::Reply, Infallible> {
    state.clear();
    Ok(warp::reply::json(&json!({"status": "ok"})))
}

pub fn routes(
    state: Arc<BridgeState>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_route = warp::path("state")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(get_state);

    let profiles_route = warp::path("profiles")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(get_profiles);

    let run_route = warp::path("run")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(post_run);

    let select_route = warp::path("select")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(post_select);

    let start_route = warp::path("start")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state.clone()))
        .and_then(post_start);

    let clear_route = warp::path("clear")
        .and(warp::path::end())
        .and(warp::post())
        .and(with_state(state))
        .and_then(post_clear);

    state_route
        .or(profiles_route)
        .or(run_route)
        .or(select_route)
        .or(start_route)
        .or(clear_route)
}

/// Hosts the HTTP endpoint the visualizer polls.
pub struct GuiBridge {
    state: Arc<BridgeState>,
    address: SocketAddr,
}

impl GuiBridge {
    pub fn serve(runner: &Runner, address: SocketAddr) -> anyhow::Result<Self> {
        let state = Arc::new(BridgeState::new(runner));
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("creating bridge runtime")?;

        let (bound, server) = {
            let _enter = runtime.enter();
            warp::serve(routes(state.clone()))
                .try_bind_ephemeral(address)
                .with_context(|| format!("binding bridge to {address}"))?
        };

        thread::Builder::new()
            .name("green-bridge".into())
            .spawn(move || runtime.block_on(server))
            .context("spawning bridge thread")?;

        info!("bridge listening on http://{}", bound);
        Ok(Self {
            state,
            address: bound,
        })
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }
}

impl Drop for GuiBridge {
    fn drop(&mut self) {
        self.state.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use std::time::Duration;

    fn test_state() -> Arc<BridgeState> {
        let runner = Runner::new(&WorkflowConfig::default());
        Arc::new(BridgeState::new(&runner))
    }

    fn model_of(body: &[u8]) -> VisualizationModel {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn run_route_drives_state_to_completion() {
        let state = test_state();
        let filter = routes(state.clone());

        let response = warp::test::request()
            .method("POST")
            .path("/run")
            .json(&json!({"algorithm": "optimized", "array_size": 500}))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        tokio::time::sleep(Duration::from_millis(2550)).await;
        let response = warp::test::request().path("/state").reply(&filter).await;
        let model = model_of(response.body());
        assert!(model.running);
        assert_eq!(model.action_label, "Running...");
        assert_eq!(model.tick, 25);

        tokio::time::sleep(Duration::from_secs(3)).await;
        let response = warp::test::request().path("/state").reply(&filter).await;
        let model = model_of(response.body());
        assert!(!model.running);
        assert_eq!(model.history.len(), 1);
        assert_eq!(model.metrics.execution_time, 0.5);
    }

    #[tokio::test(start_paused = true)]
    async fn second_run_is_reported_not_started() {
        let state = test_state();
        let filter = routes(state.clone());
        let body = json!({"algorithm": "bubble", "array_size": 1000});

        let first = warp::test::request()
            .method("POST")
            .path("/run")
            .json(&body)
            .reply(&filter)
            .await;
        let second = warp::test::request()
            .method("POST")
            .path("/run")
            .json(&json!({"algorithm": "quick", "array_size": 500}))
            .reply(&filter)
            .await;
        let first: serde_json::Value = serde_json::from_slice(first.body()).unwrap();
        let second: serde_json::Value = serde_json::from_slice(second.body()).unwrap();
        assert_eq!(first["started"], true);
        assert_eq!(second["started"], false);

        let model = state.snapshot();
        assert_eq!(model.algorithm, AlgorithmId::Bubble);
        assert_eq!(model.counters.started, 1);
    }

    #[tokio::test]
    async fn invalid_run_requests_are_rejected() {
        let filter = routes(test_state());

        let response = warp::test::request()
            .method("POST")
            .path("/run")
            .json(&json!({"algorithm": "bogo", "array_size": 500}))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = warp::test::request()
            .method("POST")
            .path("/run")
            .json(&json!({"algorithm": "quick", "array_size": 64}))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["message"], "invalid array size: 64");
    }

    #[tokio::test(start_paused = true)]
    async fn clear_route_resets_results() {
        let state = test_state();
        let filter = routes(state.clone());
        state
            .run(&RunPayload {
                algorithm: "quick".into(),
                array_size: 1000,
            })
            .unwrap();
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(state.snapshot().history.len(), 1);

        let response = warp::test::request()
            .method("POST")
            .path("/clear")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let model = state.snapshot();
        assert!(model.history.is_empty());
        assert_eq!(model.metrics, greencore::Metrics::zero());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_active_run() {
        let state = test_state();
        state
            .run(&RunPayload {
                algorithm: "bubble".into(),
                array_size: 5000,
            })
            .unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        state.shutdown();
        tokio::time::sleep(Duration::from_secs(10)).await;
        let model = state.snapshot();
        assert!(!model.running);
        assert!(model.history.is_empty());
        assert_eq!(model.counters.cancelled, 1);
    }

    #[tokio::test]
    async fn state_route_survives_poisoned_driver() {
        let state = test_state();
        let holder = state.driver.clone();
        let outcome = thread::spawn(move || {
            let _guard = holder.lock().unwrap();
            panic!("holder panicked");
        })
        .join();
        assert!(outcome.is_err());

        let response = warp::test::request()
            .path("/state")
            .reply(&routes(state.clone()))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(!model_of(response.body()).running);
        let (_, body) = post(&state, "/select", json!({"algorithm": "quick"})).await;
        assert_eq!(body["applied"], true);
    }

    #[tokio::test]
    async fn profiles_route_lists_table() {
        let filter = routes(test_state());
        let response = warp::test::request().path("/profiles").reply(&filter).await;
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["profiles"][0]["display_name"], "Bubble Sort");
        assert_eq!(body["profiles"][2]["energy_multiplier"], 1.0);
        assert_eq!(body["array_sizes"][3], 10000);
        assert_eq!(body["code_samples"][0]["title"], "Bubble Sort - O(n²)");
        assert_eq!(body["demo_steps"].as_array().unwrap().len(), 5);
    }

    async fn post(
        state: &Arc<BridgeState>,
        path: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let response = warp::test::request()
            .method("POST")
            .path(path)
            .json(&body)
            .reply(&routes(state.clone()))
            .await;
        let value = serde_json::from_slice(response.body()).unwrap();
        (response.status(), value)
    }

    #[tokio::test(start_paused = true)]
    async fn select_then_start_runs_driver_selection() {
        let state = test_state();

        let (status, body) = post(
            &state,
            "/select",
            json!({"algorithm": "quick", "array_size": 5000}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], true);
        let model = state.snapshot();
        assert_eq!(model.algorithm, AlgorithmId::Quick);
        assert_eq!(model.array_size.get(), 5000);

        let (_, body) = post(&state, "/start", json!({})).await;
        assert_eq!(body["started"], true);

        let (_, body) = post(&state, "/select", json!({"algorithm": "optimized"})).await;
        assert_eq!(body["applied"], false);
        assert_eq!(state.snapshot().algorithm, AlgorithmId::Quick);

        tokio::time::sleep(Duration::from_secs(6)).await;
        let model = state.snapshot();
        assert_eq!(model.history.len(), 1);
        assert_eq!(model.history[0].record.algorithm_name, "Quick Sort");
        assert_eq!(model.metrics.execution_time, 25.0);
    }

    #[tokio::test]
    async fn select_rejects_unknown_values() {
        let state = test_state();
        let (status, _) = post(&state, "/select", json!({"array_size": 42})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = post(&state, "/select", json!({"algorithm": "radix"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.snapshot().array_size.get(), 1000);
    }
}
