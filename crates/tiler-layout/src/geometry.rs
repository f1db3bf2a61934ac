// ABOUTME: Pixel geometry shared by the layout tree.
// ABOUTME: Dimensions, insertion positions, sizes, rectangles and stacking modes.

use serde::{Deserialize, Serialize};

/// Axis a split runs along, named after the extent it divides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    pub fn cross(self) -> Self {
        match self {
            Dimension::Width => Dimension::Height,
            Dimension::Height => Dimension::Width,
        }
    }
}

/// Where a new pane goes relative to the pane it splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Top,
    Bottom,
    Left,
    Right,
}

impl Position {
    /// Top/bottom split heights, left/right split widths.
    pub fn dimension(self) -> Dimension {
        match self {
            Position::Top | Position::Bottom => Dimension::Height,
            Position::Left | Position::Right => Dimension::Width,
        }
    }

    /// Top and left panes come first in their split.
    pub fn is_leading(self) -> bool {
        matches!(self, Position::Top | Position::Left)
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Position::Top),
            "bottom" => Ok(Position::Bottom),
            "left" => Ok(Position::Left),
            "right" => Ok(Position::Right),
            other => Err(format!("unknown position '{other}'")),
        }
    }
}

/// Pixel extent of a pane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: f64) {
        match dimension {
            Dimension::Width => self.width = value,
            Dimension::Height => self.height = value,
        }
    }

    pub fn with(mut self, dimension: Dimension, value: f64) -> Self {
        self.set(dimension, value);
        self
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

/// A point in container coordinates, as delivered by pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate that moves along a split of the given dimension.
    pub fn along(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.x,
            Dimension::Height => self.y,
        }
    }
}

/// Rectangle in container pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Start coordinate along a dimension
    pub fn start(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Width => self.x,
            Dimension::Height => self.y,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// How a pane is laid out against its sibling on the cross axis.
///
/// Children of a width split sit side by side (`Horizontal`, the serialized
/// `floating` flag); children of a height split stack (`Vertical`). The root
/// has no sibling and inherits from the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stacking {
    Vertical,
    Horizontal,
    #[default]
    Inherit,
}

impl Stacking {
    /// Stacking of the children of a split along `dimension`.
    pub fn for_split(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Width => Stacking::Horizontal,
            Dimension::Height => Stacking::Vertical,
        }
    }

    pub fn is_floating(self) -> bool {
        self == Stacking::Horizontal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_maps_to_dimension_and_order() {
        assert_eq!(Position::Top.dimension(), Dimension::Height);
        assert_eq!(Position::Right.dimension(), Dimension::Width);
        assert!(Position::Left.is_leading());
        assert!(!Position::Bottom.is_leading());
    }

    #[test]
    fn size_accessors_follow_dimension() {
        let size = Size::new(800.0, 600.0).with(Dimension::Height, 300.0);
        assert_eq!(size.get(Dimension::Width), 800.0);
        assert_eq!(size.get(Dimension::Height), 300.0);
        assert_eq!(Dimension::Width.cross(), Dimension::Height);
    }

    #[test]
    fn position_parses_case_insensitively() {
        assert_eq!("Left".parse::<Position>(), Ok(Position::Left));
        assert!("middle".parse::<Position>().is_err());
    }

    #[test]
    fn floating_only_for_width_splits() {
        assert!(Stacking::for_split(Dimension::Width).is_floating());
        assert!(!Stacking::for_split(Dimension::Height).is_floating());
        assert!(!Stacking::Inherit.is_floating());
    }
}
