use crate::{core::coordinates::Coordinate, objects::style::Color};

/// Text drawn at a location on a filled background
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub location: Coordinate,
    pub text: String,
    pub font_color: Color,
    pub back_color: Color,
    pub font_family: String,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
}

impl Label {
    pub fn new(location: impl Into<Coordinate>) -> Self {
        Self {
            location: location.into(),
            text: String::new(),
            font_color: Color::WHITE,
            back_color: Color::BLACK,
            font_family: "Arial".to_string(),
            font_size: 12.0,
            bold: false,
            italic: false,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_colors(mut self, font_color: Color, back_color: Color) -> Self {
        self.font_color = font_color;
        self.back_color = back_color;
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, size: f64) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    pub fn with_emphasis(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }
}

/// Pin icon whose tip sits on the location
#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub location: Coordinate,
    pub color: Color,
}

impl Pin {
    pub fn new(location: impl Into<Coordinate>) -> Self {
        Self {
            location: location.into(),
            color: Color::BLUE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}
