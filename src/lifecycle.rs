use crate::connection::receiver::RequestReceiver;
use crate::connection::sender::EventSender;
use crate::context::ApplicationContext;
use crate::message::client_request::ClientRequest;
use crate::message::server_event::{ErrorEvent, ErrorEventKind, ServerEvent};
use crate::session::Session;
use crate::session::error::SessionError;
use crate::store::error::StoreError;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use tracing::{debug, info};

pub async fn run_session(
	context: ApplicationContext,
	event_sender: EventSender,
	mut request_receiver: RequestReceiver,
) {
	let connection_id = context.connection_ids.next();
	let mut session = Session::new(connection_id, context, event_sender.clone());

	handle_requests(&mut session, &mut request_receiver, &event_sender).await;

	// Cleanup must run on every exit path so registry entries are always
	// released, even after a transport-level connection loss.
	session.disconnect().await;
	info!("Connection {} closed.", connection_id);
}

const QUOTA: Quota = Quota::per_second(nonzero!(1u32)).allow_burst(nonzero!(10u32));

async fn handle_requests(
	session: &mut Session,
	request_receiver: &mut RequestReceiver,
	event_sender: &EventSender,
) {
	let rate_limiter = RateLimiter::direct(QUOTA);
	while let Some(request) = request_receiver.receive().await {
		rate_limiter.until_ready().await;

		debug!("Received {} request from {}.", request.kind(), session.connection_id());

		if let Err(error) = dispatch(session, request).await {
			let _ = event_sender.send_event(ServerEvent::Error(error_event(&error))).await;
		}
	}
}

async fn dispatch(session: &mut Session, request: ClientRequest) -> Result<(), SessionError> {
	use ClientRequest::*;
	match request {
		Join(join_request) => session.join(join_request.name).await,
		Send(send_request) => session.send(send_request.message).await,
		Typing => session.typing().await,
		StoppedTyping => session.stopped_typing().await,
		Leave => session.leave().await,
		GetOnlineUsers => session.online_users().await,
	}
}

fn error_event(error: &SessionError) -> ErrorEvent {
	use SessionError::*;
	let kind = match error {
		EmptyName => ErrorEventKind::EmptyName,
		InvalidName(_) => ErrorEventKind::InvalidName,
		NameTaken => ErrorEventKind::NameInUse,
		EmptyMessage => ErrorEventKind::EmptyMessage,
		InvalidMessage(_) => ErrorEventKind::InvalidFormat,
		InvalidState { .. } => ErrorEventKind::InvalidOperation,
		Store(StoreError::Validation(_)) => ErrorEventKind::InvalidFormat,
		Store(_) => ErrorEventKind::InternalServerError,
	};
	ErrorEvent::builder().error(kind).message(error.to_string()).build()
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::store::error::ValidationError;

	#[test]
	fn session_errors_should_map_to_machine_readable_kinds() {
		assert_eq!(ErrorEventKind::EmptyName, error_event(&SessionError::EmptyName).error);
		assert_eq!(ErrorEventKind::NameInUse, error_event(&SessionError::NameTaken).error);
		assert_eq!(ErrorEventKind::EmptyMessage, error_event(&SessionError::EmptyMessage).error);
		assert_eq!(
			ErrorEventKind::InvalidName,
			error_event(&SessionError::InvalidName(ValidationError::AuthorTooLong)).error
		);
		assert_eq!(
			ErrorEventKind::InvalidOperation,
			error_event(&SessionError::InvalidState { operation: "send" }).error
		);
		assert_eq!(
			ErrorEventKind::InternalServerError,
			error_event(&SessionError::Store(StoreError::NotFound)).error
		);
	}

	#[test]
	fn error_events_should_carry_the_human_readable_message() {
		let event = error_event(&SessionError::NameTaken);
		assert_eq!("Name is already in use.", event.message);
	}
}
