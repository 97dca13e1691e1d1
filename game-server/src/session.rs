use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::io::AsyncBufReadExt;
use tracing::{info, warn};

use crate::broadcast::STOP_SENTINEL;
use crate::state::ServerState;
use game_core::{apply_guess, GuessOutcome, ALL_HIT};
use game_persistence::{CredentialCheck, RegisterOutcome};
use game_types::{Request, Response, MAX_TRIALS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// Connected, no player bound yet (also the state after LOGOUT).
    Anonymous,
    Logged,
    InGame,
    /// Terminal: the connection is being torn down.
    Interrupted,
}

/// Per-connection protocol state machine. Holds only the bound username;
/// the player record itself lives in the store, so mutations are visible
/// server-wide immediately.
struct Session {
    state: SessionState,
    player: Option<String>,
    ctx: Arc<ServerState>,
}

/// Drive one connection: read request lines, apply them against the shared
/// state, write one response per request. Returns when the session reaches
/// its terminal state, the peer closes, or a resource fault surfaces.
pub async fn handle_session<S>(stream: S, ctx: Arc<ServerState>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = BufReader::new(reader).lines();
    let mut session = Session { state: SessionState::Anonymous, player: None, ctx };

    let result = async {
        while session.state != SessionState::Interrupted {
            let line = match lines.next_line().await? {
                Some(line) => line,
                None => break,
            };

            let request = match line.parse::<Request>() {
                Ok(request) => request,
                Err(e) => {
                    // Zero retries on unparseable input: answer and close.
                    warn!("Malformed request line: {}", e);
                    write_response(&mut writer, &Response::NotOk(e.to_string())).await?;
                    break;
                }
            };

            let response = session.handle(request).await?;
            write_response(&mut writer, &response).await?;
        }
        Ok(())
    }
    .await;

    // The account binding must not outlive the connection, whatever ended it.
    if let Some(username) = session.player.take() {
        session.ctx.sessions.release(&username);
    }
    result
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> Result<()> {
    writer
        .write_all(format!("{}\n", response).as_bytes())
        .await
        .context("cannot write response")?;
    writer.flush().await.context("cannot flush response")?;
    Ok(())
}

impl Session {
    async fn handle(&mut self, request: Request) -> Result<Response> {
        match request {
            Request::Login { username, password } => Ok(self.handle_login(username, password)),
            Request::Register { username, password } => {
                self.handle_register(username, password).await
            }
            Request::Logout => Ok(self.handle_logout()),
            Request::PlayWordle => self.handle_play(),
            Request::SendWord { word } => self.handle_guess(word).await,
            Request::SendStats => self.handle_stats(),
            Request::Share => self.handle_share().await,
            Request::Exit => self.handle_exit().await,
        }
    }

    fn handle_login(&mut self, username: String, password: String) -> Response {
        if self.player.is_some() {
            return Response::NotOk("you are already logged in".to_string());
        }

        match self.ctx.store.verify_credentials(&username, &password) {
            CredentialCheck::UnknownUser => {
                Response::NotOk("this username does not exist!".to_string())
            }
            CredentialCheck::WrongPassword => Response::NotOk("wrong password!".to_string()),
            CredentialCheck::Ok => {
                if !self.ctx.sessions.claim(&username) {
                    warn!("Rejected second concurrent login for {}", username);
                    return Response::NotOk(
                        "this user is already logged in from another session".to_string(),
                    );
                }
                info!("Player {} logged in", username);
                self.player = Some(username);
                self.state = SessionState::Logged;
                Response::Ok("login successful, welcome!".to_string())
            }
        }
    }

    async fn handle_register(&mut self, username: String, password: String) -> Result<Response> {
        match self.ctx.store.register(&username, &password) {
            RegisterOutcome::AlreadyExists => {
                Ok(Response::NotOk("this username already exists".to_string()))
            }
            RegisterOutcome::Created => {
                info!("Registered new player {}", username);
                self.ctx.store.persist().await?;
                Ok(Response::Ok("user registered successfully!".to_string()))
            }
        }
    }

    fn handle_logout(&mut self) -> Response {
        match self.player.take() {
            Some(username) => {
                self.ctx.sessions.release(&username);
                self.state = SessionState::Anonymous;
                Response::Ok("user disconnected".to_string())
            }
            None => Response::NotOk("you are not logged in".to_string()),
        }
    }

    fn handle_play(&mut self) -> Result<Response> {
        let Some(username) = &self.player else {
            return Ok(Response::NotOk("you are not logged in".to_string()));
        };
        let player = self
            .ctx
            .store
            .get(username)
            .context("bound player missing from store")?;

        if player.remaining_trials == 0 {
            return Ok(Response::NotOk("no trials left for today".to_string()));
        }
        if player.has_won_today {
            return Ok(Response::NotOk("you already won today's match!".to_string()));
        }

        self.state = SessionState::InGame;
        Ok(Response::Ok(format!(
            "you can play. {} trials remaining",
            player.remaining_trials
        )))
    }

    async fn handle_guess(&mut self, word: String) -> Result<Response> {
        if self.state != SessionState::InGame {
            return Ok(Response::NotOk("you are not playing".to_string()));
        }
        let username = self.player.clone().context("in game without a bound player")?;

        let secret = self.ctx.secret.read().await.clone();

        // Vocabulary membership is checked before any state is mutated, and
        // only when the guess isn't an outright win.
        let in_vocabulary = if word == secret { false } else { self.ctx.vocabulary.contains(&word)? };

        let outcome = self
            .ctx
            .store
            .with_player(&username, |player| apply_guess(player, &word, &secret, in_vocabulary))
            .context("bound player missing from store")?;

        match outcome {
            GuessOutcome::Win { attempt } => {
                info!("Player {} won in {} attempts", username, attempt);
                self.state = SessionState::Logged;
                Ok(Response::Ok(format!("{} you won!", ALL_HIT)))
            }
            GuessOutcome::Hint { code, remaining } => {
                self.ctx.store.persist().await?;
                Ok(Response::Ok(format!("{}: {} trials remaining", code, remaining)))
            }
            GuessOutcome::OutOfTrials { code } => {
                self.state = SessionState::Logged;
                self.ctx.store.persist().await?;
                Ok(Response::Ok(format!("{}: no trials left for today!", code)))
            }
            GuessOutcome::NotInVocabulary => {
                Ok(Response::NotOk("your guessed word is not in the vocabulary".to_string()))
            }
        }
    }

    fn handle_stats(&self) -> Result<Response> {
        let Some(username) = &self.player else {
            return Ok(Response::NotOk("you are not logged in".to_string()));
        };
        let player = self
            .ctx
            .store
            .get(username)
            .context("bound player missing from store")?;

        let mut stats = format!(
            "{} {} {} {}",
            player.matches_played,
            player.win_rate(),
            player.last_streak,
            player.streak_record
        );
        for attempt in 1..=MAX_TRIALS {
            let wins = player.guess_distribution.get(&attempt).copied().unwrap_or(0);
            stats.push_str(&format!(" {}", wins));
        }
        Ok(Response::Ok(stats))
    }

    async fn handle_share(&self) -> Result<Response> {
        let Some(username) = &self.player else {
            return Ok(Response::NotOk("you must log in first".to_string()));
        };
        let player = self
            .ctx
            .store
            .get(username)
            .context("bound player missing from store")?;

        if !player.has_guessed_today() {
            return Ok(Response::NotOk("nothing to share yet".to_string()));
        }

        let payload = format!("{} {}", player.username, player.feedback.join(" "));
        self.ctx.notifier.publish(&payload).await?;
        Ok(Response::Ok("your results have been shared".to_string()))
    }

    async fn handle_exit(&mut self) -> Result<Response> {
        // The sentinel is unaddressed: every subscriber on the group sees
        // it, not just this client's.
        self.ctx.notifier.publish(STOP_SENTINEL).await?;
        self.state = SessionState::Interrupted;
        Ok(Response::Ok("goodbye!".to_string()))
    }
}
