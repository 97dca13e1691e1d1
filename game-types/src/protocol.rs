use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;

/// A request line from a client: `VERB arg1 arg2...`, space separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Login { username: String, password: String },
    Register { username: String, password: String },
    Logout,
    PlayWordle,
    SendWord { word: String },
    SendStats,
    Share,
    Exit,
}

impl FromStr for Request {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(ParseError::EmptyRequest)?;

        let mut arg = |name: &'static str| {
            tokens
                .next()
                .map(str::to_string)
                .ok_or(ParseError::MissingArgument { verb: verb.to_string(), name })
        };

        match verb {
            "LOGIN" => Ok(Request::Login {
                username: arg("username")?,
                password: arg("password")?,
            }),
            "REGISTER" => Ok(Request::Register {
                username: arg("username")?,
                password: arg("password")?,
            }),
            "LOGOUT" => Ok(Request::Logout),
            "PLAYWORDLE" => Ok(Request::PlayWordle),
            "SENDWORD" => Ok(Request::SendWord { word: arg("word")? }),
            "SENDSTATS" => Ok(Request::SendStats),
            "SHARE" => Ok(Request::Share),
            "EXIT" => Ok(Request::Exit),
            _ => Err(ParseError::UnknownVerb(verb.to_string())),
        }
    }
}

/// A response line to a client: `OK <payload>` or `NOTOK <reason>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Ok(String),
    NotOk(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok(payload) => write!(f, "OK {}", payload),
            Response::NotOk(reason) => write!(f, "NOTOK {}", reason),
        }
    }
}
