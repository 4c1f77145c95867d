//! Embed-server selection for playback.
//!
//! Playback goes through third-party embed providers keyed by IMDb id.
//! Whether a given provider actually has the title is unknowable up
//! front, so the session tracks load state per candidate and cycles
//! through the list until one works.

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no playable identifier: {0}")]
    IdentifierUnavailable(String),
}

/// Validated IMDb identifier, `tt` followed by 7 to 9 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImdbId(String);

impl ImdbId {
    pub fn parse(raw: &str) -> Option<Self> {
        let digits = raw.strip_prefix("tt")?;
        if (7..=9).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One embed server offering the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub provider: &'static str,
    pub description: &'static str,
    pub url: String,
}

pub fn movie_candidates(id: &ImdbId) -> Vec<Candidate> {
    vec![
        Candidate {
            provider: "VidSrc.xyz",
            description: "Fast & Reliable",
            url: format!("https://vidsrc.xyz/embed/movie/{id}"),
        },
        Candidate {
            provider: "VidSrc.to",
            description: "HD Quality",
            url: format!("https://vidsrc.to/embed/movie/{id}"),
        },
        Candidate {
            provider: "VidSrc.me",
            description: "Multi-Source",
            url: format!("https://vidsrc.me/embed/movie?imdb={id}"),
        },
        Candidate {
            provider: "SuperEmbed",
            description: "Multi-Server",
            url: format!("https://multiembed.mov/?video_id={id}"),
        },
        Candidate {
            provider: "2Embed",
            description: "Alternative",
            url: format!("https://www.2embed.cc/embed/{id}"),
        },
    ]
}

pub fn episode_candidates(id: &ImdbId, season: u32, episode: u32) -> Vec<Candidate> {
    vec![
        Candidate {
            provider: "VidSrc.xyz",
            description: "Fast & Reliable",
            url: format!("https://vidsrc.xyz/embed/tv/{id}/{season}/{episode}"),
        },
        Candidate {
            provider: "VidSrc.to",
            description: "HD Quality",
            url: format!("https://vidsrc.to/embed/tv/{id}/{season}/{episode}"),
        },
    ]
}

/// Fallback when no embed server works: a trailer search.
pub fn youtube_trailer_url(title: &str, year: Option<u16>) -> String {
    let query = match year {
        Some(year) => format!("{title} {year} trailer"),
        None => format!("{title} trailer"),
    };
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("https://www.youtube.com/results?search_query={encoded}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The provider's player signalled an error.
    LoadError,
    /// The provider never finished loading within the timeout.
    TimedOut,
}

impl FailureReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::LoadError => "player failed to load",
            Self::TimedOut => "server not responding",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Loading { index: usize },
    Playing { index: usize },
    Failed { index: usize, reason: FailureReason },
}

/// Tracks which embed server is active and how loading is going.
///
/// Server switching is manual by default; with `auto_advance` the
/// session moves to the next candidate on failure until every candidate
/// has failed since the last successful load.
#[derive(Debug)]
pub struct PlaybackSession {
    candidates: Vec<Candidate>,
    state: PlayerState,
    timeout: Duration,
    auto_advance: bool,
    deadline: Option<Instant>,
    failures_since_success: usize,
}

impl PlaybackSession {
    pub fn for_movie(
        raw_id: &str,
        timeout: Duration,
        auto_advance: bool,
    ) -> Result<Self, PlaybackError> {
        let id = ImdbId::parse(raw_id)
            .ok_or_else(|| PlaybackError::IdentifierUnavailable(raw_id.to_string()))?;
        Ok(Self::with_candidates(
            movie_candidates(&id),
            timeout,
            auto_advance,
        ))
    }

    pub fn for_episode(
        raw_id: &str,
        season: u32,
        episode: u32,
        timeout: Duration,
        auto_advance: bool,
    ) -> Result<Self, PlaybackError> {
        let id = ImdbId::parse(raw_id)
            .ok_or_else(|| PlaybackError::IdentifierUnavailable(raw_id.to_string()))?;
        Ok(Self::with_candidates(
            episode_candidates(&id, season, episode),
            timeout,
            auto_advance,
        ))
    }

    fn with_candidates(candidates: Vec<Candidate>, timeout: Duration, auto_advance: bool) -> Self {
        debug_assert!(!candidates.is_empty());
        let mut session = Self {
            candidates,
            state: PlayerState::Idle,
            timeout,
            auto_advance,
            deadline: None,
            failures_since_success: 0,
        };
        session.begin_loading(0);
        session
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn current_index(&self) -> usize {
        match self.state {
            PlayerState::Idle => 0,
            PlayerState::Loading { index }
            | PlayerState::Playing { index }
            | PlayerState::Failed { index, .. } => index,
        }
    }

    pub fn current(&self) -> &Candidate {
        &self.candidates[self.current_index()]
    }

    /// Every candidate has failed since the last successful load.
    pub fn exhausted(&self) -> bool {
        self.failures_since_success >= self.candidates.len()
    }

    /// The active server's player finished loading.
    pub fn mark_loaded(&mut self) {
        if let PlayerState::Loading { index } = self.state {
            self.state = PlayerState::Playing { index };
            self.deadline = None;
            self.failures_since_success = 0;
            tracing::debug!(provider = self.candidates[index].provider, "player loaded");
        }
    }

    /// The active server's player reported an error.
    pub fn mark_failed(&mut self) {
        match self.state {
            PlayerState::Loading { index } | PlayerState::Playing { index } => {
                self.fail(index, FailureReason::LoadError);
            }
            _ => {}
        }
    }

    /// Checks the load deadline. Returns true if the check transitioned
    /// the session; a no-op unless the session is loading.
    pub fn check_timeout(&mut self, now: Instant) -> bool {
        let PlayerState::Loading { index } = self.state else {
            return false;
        };
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.fail(index, FailureReason::TimedOut);
                true
            }
            _ => false,
        }
    }

    /// Cyclic manual advance to the next server.
    pub fn switch_server(&mut self) -> &Candidate {
        let next = (self.current_index() + 1) % self.candidates.len();
        self.begin_loading(next);
        self.current()
    }

    /// Jump directly to a server. Out-of-range indices wrap.
    pub fn select_server(&mut self, index: usize) -> &Candidate {
        self.begin_loading(index % self.candidates.len());
        self.current()
    }

    fn begin_loading(&mut self, index: usize) {
        self.state = PlayerState::Loading { index };
        self.deadline = Some(Instant::now() + self.timeout);
    }

    fn fail(&mut self, index: usize, reason: FailureReason) {
        self.failures_since_success += 1;
        self.state = PlayerState::Failed { index, reason };
        self.deadline = None;
        tracing::debug!(
            provider = self.candidates[index].provider,
            reason = reason.message(),
            "server failed"
        );
        if self.auto_advance && !self.exhausted() {
            self.switch_server();
        }
    }
}
