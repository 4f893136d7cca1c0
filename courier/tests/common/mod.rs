#![allow(dead_code)]

use courier::{
    AsyncHandler, CommandKey, Filter, FilterResult, HandlerResult, InvocationContext,
    MappingError, Package, RawKey, SyncHandler,
};
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

// ============================================================================
// Sessions
// ============================================================================

/// A fake connection: records replies instead of writing to a socket.
#[derive(Default)]
pub struct Session {
    pub id: u32,
    authenticated: AtomicBool,
    replies: Mutex<Vec<String>>,
}

impl Session {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn authenticated(id: u32) -> Self {
        let session = Self::new(id);
        session.authenticated.store(true, Ordering::SeqCst);
        session
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    pub fn reply(&self, line: impl Into<String>) {
        self.replies.lock().unwrap().push(line.into());
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }
}

// ============================================================================
// Text protocol
// ============================================================================

/// `COMMAND payload` lines.
pub type Line = Package<String, String>;

pub fn line(key: &str, payload: &str) -> Line {
    Package::new(key.to_string(), payload.to_string())
}

/// Split a raw line into key and payload.
pub fn parse_line(raw: String) -> Result<Line, MappingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MappingError::MissingKey);
    }
    let (key, payload) = raw.split_once(' ').unwrap_or((raw, ""));
    Ok(line(key, payload))
}

/// Marks the session as authenticated.
pub struct Login;

impl AsyncHandler<Session, Line> for Login {
    async fn execute(&self, session: &Session, message: &Line) -> HandlerResult {
        if message.payload.is_empty() {
            return Err("missing user".into());
        }
        session.authenticated.store(true, Ordering::SeqCst);
        session.reply(format!("welcome {}", message.payload));
        Ok(())
    }
}

/// Replies with the payload.
pub struct Echo;

impl SyncHandler<Session, Line> for Echo {
    fn execute(&self, session: &Session, message: &Line) -> HandlerResult {
        session.reply(message.payload.clone());
        Ok(())
    }
}

/// Halts any command on an unauthenticated session.
pub struct RequireAuth;

impl<M: courier::KeyedMessage> Filter<Session, M> for RequireAuth {
    async fn on_executing(&self, ctx: &InvocationContext<'_, Session, M>) -> FilterResult {
        ctx.session().is_authenticated().into()
    }

    async fn on_executed(&self, ctx: &InvocationContext<'_, Session, M>) {
        if ctx.is_halted() {
            ctx.session().reply("denied");
        }
    }
}

// ============================================================================
// Binary protocol
// ============================================================================

/// One-byte opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Hello,
    Ping,
    Quit,
}

impl CommandKey for Opcode {
    fn from_raw(raw: &RawKey) -> Option<Self> {
        match raw {
            RawKey::Integer(0x01) => Some(Opcode::Hello),
            RawKey::Integer(0x02) => Some(Opcode::Ping),
            RawKey::Integer(0x7f) => Some(Opcode::Quit),
            _ => None,
        }
    }
}

pub type Frame = Package<Opcode, Vec<u8>>;

/// Decode `[opcode, body...]`.
pub fn decode_frame(bytes: Vec<u8>) -> Result<Frame, MappingError> {
    let (&opcode, body) = bytes.split_first().ok_or(MappingError::MissingKey)?;
    let opcode = Opcode::from_raw(&RawKey::from(opcode))
        .ok_or_else(|| MappingError::Malformed(format!("unknown opcode {opcode:#04x}")))?;
    Ok(Package::new(opcode, body.to_vec()))
}
