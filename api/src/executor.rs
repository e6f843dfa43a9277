use std::time::Instant;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    db::repository::HistoryStore,
    domain::{
        request::Request,
        response::{Cookie, Response},
    },
    error::ExecuteError,
    utilities::{request::build_request, response::build_response},
};

/// What a successful send hands back: the request as recorded in history
/// (id assigned, no longer dirty) and the normalized response.
#[derive(Clone, Debug)]
pub struct Sent {
    pub request: Request,
    pub response: Response,
}

/// Performs sends and records each successful one in history.
#[derive(Clone, Debug)]
pub struct Executor {
    client: reqwest::Client,
    history: HistoryStore,
}

impl Executor {
    pub fn new(client: reqwest::Client, history: HistoryStore) -> Self {
        Executor { client, history }
    }

    pub async fn execute(
        &self,
        mut request: Request,
        cancel: CancellationToken,
    ) -> Result<Sent, ExecuteError> {
        let builder = build_request(&self.client, &request)?;
        log::info!("sending {} {}", request.method, request.url);

        let started = Instant::now();
        let exchange = async {
            let res = builder.send().await?;
            let duration = started.elapsed();
            let status = res.status();
            let headers = res.headers().clone();
            let cookies: Vec<Cookie> = res.cookies().map(Cookie::from).collect();
            let body = res.bytes().await?;
            Ok::<Response, reqwest::Error>(build_response(status, &headers, cookies, &body, duration))
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("canceled {} {} after {:?}", request.method, request.url, started.elapsed());
                return Err(ExecuteError::Canceled);
            }
            result = exchange => match result {
                Ok(response) => response,
                Err(e) => {
                    log::warn!("{} {} failed after {:?}: {}", request.method, request.url, started.elapsed(), e);
                    return Err(ExecuteError::Transport(e));
                }
            },
        };

        // a cancel that lands after the response still wins over the save
        if cancel.is_cancelled() {
            return Err(ExecuteError::Canceled);
        }

        let id = self.history.save(&request)?;
        request.id = Some(id);
        request.mark_clean();
        log::info!(
            "{} {} -> {} in {:?} ({})",
            request.method,
            request.url,
            response.status,
            response.duration,
            response.size
        );
        Ok(Sent { request, response })
    }

    /// Runs [`Executor::execute`] on its own task so the caller never waits
    /// on network i/o.
    pub fn spawn(
        &self,
        request: Request,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<Sent, ExecuteError>> {
        let executor = self.clone();
        tokio::spawn(async move { executor.execute(request, cancel).await })
    }
}

/// Handle for one send started through [`InFlight::begin`].
#[derive(Clone, Debug)]
pub struct SendTicket {
    pub generation: u64,
    pub token: CancellationToken,
}

/// The one outstanding send of a tab. Starting a new send cancels the
/// previous one instead of queueing behind it.
#[derive(Debug, Default)]
pub struct InFlight {
    current: Option<SendTicket>,
    generation: u64,
}

impl InFlight {
    pub fn begin(&mut self) -> SendTicket {
        self.cancel();
        self.generation += 1;
        let ticket = SendTicket {
            generation: self.generation,
            token: CancellationToken::new(),
        };
        self.current = Some(ticket.clone());
        ticket
    }

    /// Returns whether there was a send to cancel.
    pub fn cancel(&mut self) -> bool {
        match self.current.take() {
            Some(ticket) => {
                ticket.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Clears the slot once the send behind `ticket` has finished. A ticket
    /// that was already superseded leaves the newer send alone.
    pub fn finish(&mut self, ticket: &SendTicket) {
        if self
            .current
            .as_ref()
            .is_some_and(|current| current.generation == ticket.generation)
        {
            self.current = None;
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
