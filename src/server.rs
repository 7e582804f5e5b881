use crate::connection::receiver::{RequestReceiver, StreamRequestReceiver};
use crate::connection::sender::{EventSender, SinkEventSender};
use crate::context::ApplicationContext;
use crate::lifecycle::run_session;
use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use futures_util::StreamExt;
use std::future::ready;
use tower_http::cors::CorsLayer;

mod rest_api;

pub async fn run_server(context: ApplicationContext) -> Result<(), std::io::Error> {
	let address = context.configuration.address;
	let router = create_router(context);

	axum_server::bind(address).serve(router.into_make_service()).await
}

pub fn create_router(context: ApplicationContext) -> Router {
	Router::new()
		.route("/ws", get(websocket))
		.nest("/api", rest_api::router())
		.layer(CorsLayer::permissive())
		.with_state(context)
}

async fn websocket(State(context): State<ApplicationContext>, upgrade: WebSocketUpgrade) -> Response {
	upgrade.on_upgrade(move |websocket| {
		let (sink, stream) = websocket.split();

		let event_sender = EventSender::from(SinkEventSender::new(sink));
		// Transport errors are equivalent to the connection being gone.
		let stream = stream.filter_map(|message| ready(message.ok()));
		let request_receiver = RequestReceiver::from(StreamRequestReceiver::new(stream, event_sender.clone()));

		run_session(context, event_sender, request_receiver)
	})
}
