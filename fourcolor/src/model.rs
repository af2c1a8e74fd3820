use serde::{Deserialize, Serialize};

pub type NodeId = u32;
pub type EdgeId = u32;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Color priority of a node. 1..=4 are the permanent colors, 5 marks a node the
/// greedy pass could not color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Priority {
    Yellow = 1,
    Green = 2,
    Blue = 3,
    Red = 4,
    Overflow = 5,
}

impl Priority {
    pub const PERMANENT: [Priority; 4] = [Priority::Yellow, Priority::Green, Priority::Blue, Priority::Red];

    pub fn from_u8(v: u8) -> Option<Priority> {
        match v {
            1 => Some(Priority::Yellow),
            2 => Some(Priority::Green),
            3 => Some(Priority::Blue),
            4 => Some(Priority::Red),
            5 => Some(Priority::Overflow),
            _ => None,
        }
    }
    pub fn as_u8(self) -> u8 {
        self as u8
    }
    pub fn is_overflow(self) -> bool {
        self == Priority::Overflow
    }
    /// Slot in a 4-bucket histogram; `None` for overflow.
    pub fn index(self) -> Option<usize> {
        match self {
            Priority::Overflow => None,
            p => Some(p as usize - 1),
        }
    }
    pub fn color_name(self) -> &'static str {
        match self {
            Priority::Yellow => "yellow",
            Priority::Green => "green",
            Priority::Blue => "blue",
            Priority::Red => "red",
            Priority::Overflow => "overflow",
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p as u8
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;
    fn try_from(v: u8) -> Result<Self, Self::Error> {
        Priority::from_u8(v).ok_or_else(|| format!("color priority {} outside 1..=5", v))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub pos: Vec2,
    pub fixed: bool,
    pub locked: bool,
    pub enclosed: bool,
    pub priority: Priority,
    // incident edges, clockwise from North once the rotation is computed
    pub ordered: Vec<EdgeId>,
}

impl Node {
    pub fn new(pos: Vec2) -> Self {
        Node {
            pos,
            fixed: false,
            locked: false,
            enclosed: false,
            priority: Priority::Overflow,
            ordered: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub a: NodeId,
    pub b: NodeId,
    pub offset: Vec2,
    pub fixed: bool,
    pub locked: bool,
}

impl Edge {
    pub fn other(&self, n: NodeId) -> Option<NodeId> {
        if self.a == n {
            Some(self.b)
        } else if self.b == n {
            Some(self.a)
        } else {
            None
        }
    }
    pub fn touches(&self, n: NodeId) -> bool {
        self.a == n || self.b == n
    }
}
