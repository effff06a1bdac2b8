use serde::Deserialize;
use std::{fmt, str::FromStr};

use super::error::CursorError;

/// Standard, platform-independent pointer shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum CursorShape {
    #[default]
    Arrow,
    Ibeam,
    Wait,
    Cross,
    UpArrow,
    SizeWestEast,
    SizeNorthSouth,
    SizeAll,
    No,
    Hand,
    AppStarting,
    Help,
    TopSide,
    BottomSide,
    LeftSide,
    RightSide,
    TopLeftCorner,
    TopRightCorner,
    BottomLeftCorner,
    BottomRightCorner,
    DragMove,
    DragCopy,
    DragLink,
    None,
}

impl CursorShape {
    pub const ALL: [CursorShape; 24] = [
        CursorShape::Arrow,
        CursorShape::Ibeam,
        CursorShape::Wait,
        CursorShape::Cross,
        CursorShape::UpArrow,
        CursorShape::SizeWestEast,
        CursorShape::SizeNorthSouth,
        CursorShape::SizeAll,
        CursorShape::No,
        CursorShape::Hand,
        CursorShape::AppStarting,
        CursorShape::Help,
        CursorShape::TopSide,
        CursorShape::BottomSide,
        CursorShape::LeftSide,
        CursorShape::RightSide,
        CursorShape::TopLeftCorner,
        CursorShape::TopRightCorner,
        CursorShape::BottomLeftCorner,
        CursorShape::BottomRightCorner,
        CursorShape::DragMove,
        CursorShape::DragCopy,
        CursorShape::DragLink,
        CursorShape::None,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CursorShape::Arrow => "Arrow",
            CursorShape::Ibeam => "Ibeam",
            CursorShape::Wait => "Wait",
            CursorShape::Cross => "Cross",
            CursorShape::UpArrow => "UpArrow",
            CursorShape::SizeWestEast => "SizeWestEast",
            CursorShape::SizeNorthSouth => "SizeNorthSouth",
            CursorShape::SizeAll => "SizeAll",
            CursorShape::No => "No",
            CursorShape::Hand => "Hand",
            CursorShape::AppStarting => "AppStarting",
            CursorShape::Help => "Help",
            CursorShape::TopSide => "TopSide",
            CursorShape::BottomSide => "BottomSide",
            CursorShape::LeftSide => "LeftSide",
            CursorShape::RightSide => "RightSide",
            CursorShape::TopLeftCorner => "TopLeftCorner",
            CursorShape::TopRightCorner => "TopRightCorner",
            CursorShape::BottomLeftCorner => "BottomLeftCorner",
            CursorShape::BottomRightCorner => "BottomRightCorner",
            CursorShape::DragMove => "DragMove",
            CursorShape::DragCopy => "DragCopy",
            CursorShape::DragLink => "DragLink",
            CursorShape::None => "None",
        }
    }
}

impl fmt::Display for CursorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CursorShape {
    type Err = CursorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CursorError::UnrecognizedCursorName(s.to_string()))
    }
}

impl TryFrom<String> for CursorShape {
    type Error = CursorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        CursorShape::from_str(&s)
    }
}
