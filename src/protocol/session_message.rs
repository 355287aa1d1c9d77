//! Negotiation message grammar: `<hash>:<payload>`.
//!
//! Raw strings are parsed once here into `SessionMessage`; everything past this
//! boundary dispatches on `SessionPayload` and never looks at the text again.
//! Turn payloads are only shape-checked (three fields, a valid mover); full
//! decoding belongs to the state machine, where a bad turn is a cheat signal
//! rather than an unreadable message.

use std::fmt;
use std::str::FromStr;

use rand::prelude::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::MessageError;
use crate::game_state::chess_rules::{
    PAYLOAD_ARGUMENT_DELIMITER, SESSION_DELIMITER, SESSION_HASH_LEN, TURN_FIELD_DELIMITER,
};
use crate::game_state::chess_types::{Color, GameStatus};

const HASH_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Token scoping every message of one negotiated game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionHash(String);

impl SessionHash {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let token = (0..SESSION_HASH_LEN)
            .filter_map(|_| HASH_ALPHABET.choose(rng).copied())
            .map(char::from)
            .collect();
        Self(token)
    }

    pub fn parse(text: &str) -> Result<Self, MessageError> {
        let well_formed =
            text.len() == SESSION_HASH_LEN && text.bytes().all(|b| b.is_ascii_alphanumeric());
        if well_formed {
            Ok(Self(text.to_owned()))
        } else {
            Err(MessageError::InvalidHash(text.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionHash {
    type Error = MessageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionHash> for String {
    fn from(hash: SessionHash) -> Self {
        hash.0
    }
}

impl fmt::Display for SessionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A move-shaped payload: the raw turn text plus the mover it claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPayload {
    pub text: String,
    pub mover: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPayload {
    /// The inviter's own color.
    Invite(Color),
    /// The acceptor's own color.
    Accept(Color),
    Decline,
    GameOver(GameStatus),
    End,
    Turn(TurnPayload),
}

impl SessionPayload {
    pub fn parse(text: &str) -> Result<Self, MessageError> {
        match text {
            "D" => return Ok(SessionPayload::Decline),
            "E" => return Ok(SessionPayload::End),
            _ => {}
        }

        if let Some((tag, argument)) = text.split_once(PAYLOAD_ARGUMENT_DELIMITER) {
            match tag {
                "I" => return parse_color(argument).map(SessionPayload::Invite),
                "A" => return parse_color(argument).map(SessionPayload::Accept),
                "O" => {
                    return GameStatus::from_name(argument)
                        .map(SessionPayload::GameOver)
                        .ok_or_else(|| MessageError::InvalidStatus(argument.to_owned()));
                }
                _ => {}
            }
        }

        let fields: Vec<&str> = text.split(TURN_FIELD_DELIMITER).collect();
        if let [_, mover, _] = fields[..] {
            if let Ok(mover) = parse_color(mover) {
                return Ok(SessionPayload::Turn(TurnPayload {
                    text: text.to_owned(),
                    mover,
                }));
            }
        }
        Err(MessageError::UnknownPayload(text.to_owned()))
    }
}

fn parse_color(text: &str) -> Result<Color, MessageError> {
    let mut chars = text.chars();
    match (chars.next().and_then(Color::from_char), chars.next()) {
        (Some(color), None) => Ok(color),
        _ => Err(MessageError::InvalidColor(text.to_owned())),
    }
}

impl fmt::Display for SessionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = PAYLOAD_ARGUMENT_DELIMITER;
        match self {
            SessionPayload::Invite(color) => write!(f, "I{sep}{}", color.to_char()),
            SessionPayload::Accept(color) => write!(f, "A{sep}{}", color.to_char()),
            SessionPayload::Decline => f.write_str("D"),
            SessionPayload::GameOver(status) => write!(f, "O{sep}{}", status.name()),
            SessionPayload::End => f.write_str("E"),
            SessionPayload::Turn(turn) => f.write_str(&turn.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub hash: SessionHash,
    pub payload: SessionPayload,
}

impl SessionMessage {
    pub fn new(hash: SessionHash, payload: SessionPayload) -> Self {
        Self { hash, payload }
    }

    pub fn parse(text: &str) -> Result<Self, MessageError> {
        let (hash, payload) = text
            .split_once(SESSION_DELIMITER)
            .ok_or(MessageError::MissingDelimiter)?;
        Ok(Self {
            hash: SessionHash::parse(hash)?,
            payload: SessionPayload::parse(payload)?,
        })
    }
}

impl FromStr for SessionMessage {
    type Err = MessageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SessionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.hash, SESSION_DELIMITER, self.payload)
    }
}
