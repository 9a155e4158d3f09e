use std::fmt;

/// Seat number of a player, also used as its team number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct PlayerId(usize);

impl PlayerId {
    pub const fn new(index: usize) -> Self {
        PlayerId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0 + 1)
    }
}

/// Colour of a player's pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Red,
    Yellow,
    Green,
    Blue,
}

impl Token {
    pub const ALL: [Token; 4] = [Token::Red, Token::Yellow, Token::Green, Token::Blue];

    /// Token for a seat; wraps around past the fourth player.
    pub fn for_seat(id: PlayerId) -> Token {
        Self::ALL[id.index() % Self::ALL.len()]
    }

    /// Get token name for display
    pub fn name(self) -> &'static str {
        match self {
            Token::Red => "Red",
            Token::Yellow => "Yellow",
            Token::Green => "Green",
            Token::Blue => "Blue",
        }
    }
}

/// Who a player is, fixed for the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub token: Token,
}

impl PlayerInfo {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        PlayerInfo {
            id,
            name: name.into(),
            token: Token::for_seat(id),
        }
    }
}
