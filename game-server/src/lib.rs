use std::sync::Arc;
use warp::Filter;

use crate::game_manager::GameManager;

pub mod config;
pub mod game_manager;
pub mod websocket;

pub fn create_routes(
    game_manager: Arc<GameManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let game_manager_filter = warp::any().map(move || game_manager.clone());

    // WebSocket endpoint
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(game_manager_filter.clone())
        .map(|ws: warp::ws::Ws, game_mgr| {
            ws.on_upgrade(move |socket| websocket::handle_connection(socket, game_mgr))
        });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // In-memory leaderboard of named players
    let leaderboard = warp::path("leaderboard")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_leaderboard_request);

    // Match and round progress
    let status = warp::path("status")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_status_request);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .or(leaderboard)
        .or(status)
        .with(cors)
        .with(warp::log("digit_arena"))
}

async fn handle_leaderboard_request(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let leaderboard = game_manager.leaderboard().await;
    Ok(warp::reply::with_status(
        warp::reply::json(&leaderboard),
        warp::http::StatusCode::OK,
    ))
}

async fn handle_status_request(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let status = game_manager.status().await;
    Ok(warp::reply::with_status(
        warp::reply::json(&status),
        warp::http::StatusCode::OK,
    ))
}
