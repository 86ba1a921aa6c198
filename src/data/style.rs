use crate::objects::style::{Color, Pen, Stroke};

/// Dash pattern understood by the rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashPattern {
    Solid,
    Dash,
    ShortDash,
}

impl From<Stroke> for DashPattern {
    fn from(stroke: Stroke) -> Self {
        match stroke {
            Stroke::Solid => DashPattern::Solid,
            Stroke::Dashed => DashPattern::Dash,
            Stroke::ShortDashed => DashPattern::ShortDash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub dash: DashPattern,
}

impl From<&Pen> for LineStyle {
    fn from(pen: &Pen) -> Self {
        Self {
            color: pen.color,
            width: pen.width,
            dash: pen.stroke.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    pub family: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

/// Renderer-side style of a feature
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureStyle {
    /// Filled ellipse, scaled against a 32 px base symbol
    Symbol { fill: Color, scale: f64 },
    Line(LineStyle),
    Area { fill: Color, outline: LineStyle },
    Label {
        text: String,
        font: FontStyle,
        fore_color: Color,
        back_color: Color,
    },
    /// Pin image anchored at its bottom center
    Image {
        fill: Color,
        stroke: Color,
        offset: (f64, f64),
    },
}
