//! A2S packet encoding and decoding.
//!
//! Every A2S datagram starts with a little-endian `i32` header: `-1` for a
//! message that fits in a single datagram, `-2` for one fragment of a split
//! message. The message itself starts with a one byte type followed by the
//! type specific payload.
//!
//! ```text
//! request : FF FF FF FF | 56 ('V') | challenge i32     (rules)
//!           FF FF FF FF | 55 ('U') | challenge i32     (players)
//! reply   : FF FF FF FF | 41 ('A') | challenge i32
//!           FF FF FF FF | 45 ('E') | count u16 | (name\0 value\0)*
//!           FF FF FF FF | 44 ('D') | count u8  | (index u8 name\0 score i32 duration f32)*
//! split   : FF FF FF FE | id i32 | total u8 | number u8 | size u16 | fragment
//! ```

use std::time::Duration;

use crate::query::{
    QueryError,
    structs::{Player, Rule},
};

/// Header of a message carried by a single datagram.
const SINGLE_PACKET: i32 = -1;
/// Header of a fragment of a message split across datagrams.
const SPLIT_PACKET: i32 = -2;
/// Challenge value used before the server handed one out.
pub const NO_CHALLENGE: i32 = -1;
/// Message type of a challenge reply.
pub const CHALLENGE_RESPONSE: u8 = 0x41;
/// Bit of the split id marking a bzip2 compressed message.
const COMPRESSED_FLAG: u32 = 0x8000_0000;

/// The two A2S requests the bot issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// A2S_RULES, answered with the server rule list
    Rules,
    /// A2S_PLAYER, answered with the connected players
    Players,
}

impl Request {
    fn header(self) -> u8 {
        match self {
            Request::Rules => 0x56,
            Request::Players => 0x55,
        }
    }

    /// Message type the server uses to answer this request.
    pub fn response_header(self) -> u8 {
        match self {
            Request::Rules => 0x45,
            Request::Players => 0x44,
        }
    }

    /// Encodes the request with the given challenge.
    pub fn encode(self, challenge: i32) -> Vec<u8> {
        let mut buf = Vec::with_capacity(9);
        buf.extend_from_slice(&SINGLE_PACKET.to_le_bytes());
        buf.push(self.header());
        buf.extend_from_slice(&challenge.to_le_bytes());
        buf
    }
}

/// A decoded datagram.
#[derive(Debug, PartialEq, Eq)]
pub enum Datagram {
    /// A whole message, starting with its type byte
    Single(Vec<u8>),
    /// One fragment of a split message
    Split(Fragment),
}

/// A fragment of a split message.
#[derive(Debug, PartialEq, Eq)]
pub struct Fragment {
    /// Identifier shared by every fragment of the message
    pub id: i32,
    /// Number of fragments of the message
    pub total: u8,
    /// Position of this fragment, starting at 0
    pub number: u8,
    /// Fragment bytes
    pub payload: Vec<u8>,
}

/// Decodes the header of a received datagram.
pub fn decode_datagram(datagram: &[u8]) -> Result<Datagram, QueryError> {
    let mut reader = Reader::new(datagram);

    match reader.i32()? {
        SINGLE_PACKET => Ok(Datagram::Single(reader.rest().to_vec())),
        SPLIT_PACKET => {
            let id = reader.i32()?;
            if id as u32 & COMPRESSED_FLAG != 0 {
                return Err(QueryError::Protocol(
                    "compressed split responses are not supported".to_owned(),
                ));
            }
            let total = reader.u8()?;
            let number = reader.u8()?;
            // Maximum datagram size, unused when reassembling
            reader.u16()?;

            if total == 0 || number >= total {
                return Err(QueryError::Protocol(format!(
                    "invalid fragment {} of {}",
                    number, total
                )));
            }

            Ok(Datagram::Split(Fragment {
                id,
                total,
                number,
                payload: reader.rest().to_vec(),
            }))
        }
        header => Err(QueryError::Protocol(format!(
            "unknown packet header {:#x}",
            header
        ))),
    }
}

/// Reassembles the fragments of a split message.
#[derive(Debug, Default)]
pub struct SplitAssembler {
    id: Option<i32>,
    parts: Vec<Option<Vec<u8>>>,
}

impl SplitAssembler {
    /// Stores a fragment and returns the whole message once every fragment arrived.
    ///
    /// Fragments of another message than the first one received are rejected.
    pub fn push(&mut self, fragment: Fragment) -> Result<Option<Vec<u8>>, QueryError> {
        match self.id {
            None => {
                self.id = Some(fragment.id);
                self.parts = vec![None; fragment.total as usize];
            }
            Some(id) if id != fragment.id || self.parts.len() != fragment.total as usize => {
                return Err(QueryError::Protocol(format!(
                    "fragment of message {} while reassembling {}",
                    fragment.id, id
                )));
            }
            Some(_) => {}
        }

        self.parts[fragment.number as usize] = Some(fragment.payload);

        if self.parts.iter().any(Option::is_none) {
            return Ok(None);
        }

        let joined: Vec<u8> = self.parts.drain(..).flatten().flatten().collect();
        self.id = None;

        // The reassembled payload carries its own single packet header
        match decode_datagram(&joined)? {
            Datagram::Single(message) => Ok(Some(message)),
            Datagram::Split(_) => Err(QueryError::Protocol(
                "split message nested in a split message".to_owned(),
            )),
        }
    }
}

/// Decodes the payload of an A2S_RULES reply, after its type byte.
pub fn decode_rules(payload: &[u8]) -> Result<Vec<Rule>, QueryError> {
    let mut reader = Reader::new(payload);
    let count = reader.u16()?;

    let mut rules = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name = reader.cstring()?;
        let value = reader.cstring()?;
        rules.push(Rule { name, value });
    }

    Ok(rules)
}

/// Decodes the payload of an A2S_PLAYER reply, after its type byte.
pub fn decode_players(payload: &[u8]) -> Result<Vec<Player>, QueryError> {
    let mut reader = Reader::new(payload);
    let count = reader.u8()?;

    let mut players = Vec::with_capacity(count as usize);
    for _ in 0..count {
        // Index, always 0 on most servers
        reader.u8()?;
        let name = reader.cstring()?;
        let score = reader.i32()?;
        let duration = Duration::try_from_secs_f32(reader.f32()?).unwrap_or_default();
        players.push(Player {
            name,
            score,
            duration,
        });
    }

    Ok(players)
}

/// Little-endian cursor over a received buffer.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], QueryError> {
        let bytes = self
            .buf
            .get(self.pos..self.pos + N)
            .ok_or_else(|| QueryError::Protocol(format!("truncated at byte {}", self.pos)))?;
        self.pos += N;

        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    fn u8(&mut self) -> Result<u8, QueryError> {
        Ok(self.take::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, QueryError> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    fn i32(&mut self) -> Result<i32, QueryError> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    fn f32(&mut self) -> Result<f32, QueryError> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    fn cstring(&mut self) -> Result<String, QueryError> {
        let rest = &self.buf[self.pos..];
        let end = rest.iter().position(|&b| b == 0).ok_or_else(|| {
            QueryError::Protocol(format!("unterminated string at byte {}", self.pos))
        })?;
        let value = String::from_utf8_lossy(&rest[..end]).into_owned();
        self.pos += end + 1;
        Ok(value)
    }

    fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }
}
