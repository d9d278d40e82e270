// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::{FromPrimitive, ToPrimitive};
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};

// TableIndex is a trait for all types that can serve as an index into a table.
// It is common to use these types as indices into tables, so this trait allows
// any type implementing To and FromPrimitive to be used as table indices.
pub trait TableIndex {
    fn as_index(self) -> usize;
    fn from_index(idx: usize) -> Self;
}

impl<T> TableIndex for T
where
    T: FromPrimitive + ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_u32().unwrap() as usize
    }

    fn from_index(idx: usize) -> T {
        <T as FromPrimitive>::from_u64(idx as u64).unwrap()
    }
}

/// A square on the board. Squares are numbered row-major starting from a1, so that
/// `index = rank * 8 + file`.
#[rustfmt::skip]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, ToPrimitive)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

/// The largest file or rank distance a single step may cover. Knight jumps span at most two
/// files and two ranks; any index offset that lands further away than that has wrapped around
/// an edge of the board.
const MAX_STEP_SPAN: i32 = 2;

impl Square {
    pub fn of(rank: Rank, file: File) -> Square {
        Square::from_index(rank.as_index() * 8 + file.as_index())
    }

    pub fn rank(self) -> Rank {
        Rank::from_index(self.as_index() >> 3)
    }

    pub fn file(self) -> File {
        File::from_index(self.as_index() & 7)
    }

    /// Offsets this square by a raw index delta, rejecting results that fall off the board
    /// either vertically (index out of range) or horizontally (wrapping across a file edge).
    pub fn offset(self, delta: i32) -> Option<Square> {
        let target = self as i32 + delta;
        if target < 0 || target >= 64 {
            return None;
        }

        let target = Square::from_index(target as usize);
        let file_span = (self.file() as i32 - target.file() as i32).abs();
        let rank_span = (self.rank() as i32 - target.rank() as i32).abs();
        if file_span > MAX_STEP_SPAN || rank_span > MAX_STEP_SPAN {
            return None;
        }

        Some(target)
    }

    pub fn towards(self, dir: Direction) -> Option<Square> {
        self.offset(dir.as_vector())
    }

    /// Parses a two-character square name such as `e4`.
    pub fn parse(name: &str) -> Option<Square> {
        let mut chars = name.chars();
        let file = File::try_from(chars.next()?).ok()?;
        let rank = Rank::try_from(chars.next()?).ok()?;
        if chars.next().is_some() {
            return None;
        }

        Some(Square::of(rank, file))
    }
}

/// Looks up a square by name. Only for callers that have already validated the name; a malformed
/// name is a programming error and panics.
pub fn square(name: &str) -> Square {
    assert!(name.len() == 2, "invalid square format: {:?}", name);
    match Square::parse(name) {
        Some(sq) => sq,
        None => panic!("invalid chess square: {:?}", name),
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

pub fn squares() -> impl DoubleEndedIterator<Item = Square> {
    (0..64).map(Square::from_index)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'1' + *self as u8) as char)
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::from_index(value as usize - '1' as usize)),
            _ => Err(()),
        }
    }
}

pub static RANKS: [Rank; 8] = [
    Rank::One,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'a'..='h' => Ok(File::from_index(value as usize - 'a' as usize)),
            _ => Err(()),
        }
    }
}

pub static FILES: [File; 8] = [
    File::A,
    File::B,
    File::C,
    File::D,
    File::E,
    File::F,
    File::G,
    File::H,
];

/// The side a piece belongs to. The discriminant is the color bit of a piece encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The direction this color's pawns advance in.
    pub fn forward(self) -> Direction {
        match self {
            Color::White => Direction::North,
            Color::Black => Direction::South,
        }
    }

    /// The rank this color's king and rooks start on.
    pub fn back_rank(self) -> Rank {
        match self {
            Color::White => Rank::One,
            Color::Black => Rank::Eight,
        }
    }

    /// The rank this color's pawns start on, and double-push from.
    pub fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::Two,
            Color::Black => Rank::Seven,
        }
    }

    pub fn promotion_rank(self) -> Rank {
        self.toggle().back_rank()
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

/// The kind of a piece. The discriminant is the piece-type bit of a piece encoding; exactly one
/// of these bits is set on an occupied square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum PieceKind {
    Pawn = 2,
    Knight = 4,
    Bishop = 8,
    Rook = 16,
    Queen = 32,
    King = 64,
}

impl PieceKind {
    /// Dense index of this kind, 0 for pawns through 5 for kings.
    pub fn ordinal(self) -> usize {
        (self as u8).trailing_zeros() as usize - 1
    }

    /// The upper-case letter used for this piece in algebraic notation. Pawns have none.
    pub fn notation_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            PieceKind::Knight => Some('N'),
            PieceKind::Bishop => Some('B'),
            PieceKind::Rook => Some('R'),
            PieceKind::Queen => Some('Q'),
            PieceKind::King => Some('K'),
        }
    }

    pub fn from_notation_letter(c: char) -> Option<PieceKind> {
        let kind = match c {
            'N' => PieceKind::Knight,
            'B' => PieceKind::Bishop,
            'R' => PieceKind::Rook,
            'Q' => PieceKind::Queen,
            'K' => PieceKind::King,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_minor(self) -> bool {
        match self {
            PieceKind::Knight | PieceKind::Bishop => true,
            _ => false,
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char(self.notation_letter().unwrap_or('P'))
    }
}

pub static PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

pub static PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub fn as_vector(self) -> i32 {
        match self {
            Direction::North => 8,
            Direction::NorthEast => 9,
            Direction::East => 1,
            Direction::SouthEast => -7,
            Direction::South => -8,
            Direction::SouthWest => -9,
            Direction::West => -1,
            Direction::NorthWest => 7,
        }
    }
}

pub static ORTHOGONALS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

pub static DIAGONALS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

pub static ALL_DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

pub static KNIGHT_OFFSETS: [i32; 8] = [17, 15, 10, 6, -6, -10, -15, -17];

bitflags! {
    pub struct CastleStatus: u8 {
        const NONE = 0;
        const WHITE_KINGSIDE = 0b0000_0001;
        const WHITE_QUEENSIDE =0b0000_0010;
        const WHITE = Self::WHITE_KINGSIDE.bits | Self::WHITE_QUEENSIDE.bits;
        const BLACK_KINGSIDE = 0b0000_0100;
        const BLACK_QUEENSIDE = 0b0000_1000;
        const BLACK = Self::BLACK_KINGSIDE.bits | Self::BLACK_QUEENSIDE.bits;
    }
}

impl CastleStatus {
    pub fn kingside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_KINGSIDE,
            Color::Black => CastleStatus::BLACK_KINGSIDE,
        }
    }

    pub fn queenside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_QUEENSIDE,
            Color::Black => CastleStatus::BLACK_QUEENSIDE,
        }
    }

    pub fn both(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE,
            Color::Black => CastleStatus::BLACK,
        }
    }
}

/// The bit that distinguishes second-mover pieces from first-mover pieces in a piece encoding.
pub const COLOR_BIT: u8 = 1;

/// Mask of every bit that may name a piece kind.
const KIND_MASK: u8 = 0b0111_1110;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }

    /// Packs this piece into its bitmask encoding: the kind bit combined with the color bit.
    pub fn encode(self) -> u8 {
        self.kind as u8 | self.color as u8
    }

    /// Unpacks a bitmask encoding. Returns `None` for the empty encoding (0) and for any value that
    /// does not carry exactly one piece-kind bit.
    pub fn decode(bits: u8) -> Option<Piece> {
        let kind_bits = bits & KIND_MASK;
        if kind_bits == 0 || !kind_bits.is_power_of_two() || bits & !(KIND_MASK | COLOR_BIT) != 0 {
            return None;
        }

        let kind = PieceKind::from_u8(kind_bits)?;
        let color = if bits & COLOR_BIT == 0 {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }
}

impl TryFrom<char> for Piece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(()),
        };
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Piece::new(kind, color))
    }
}

impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        match self.color {
            Color::White => f.write_char(chr.to_ascii_uppercase()),
            Color::Black => f.write_char(chr),
        }
    }
}
