#![forbid(unsafe_code)]

//! Text annotation. Placed like any component but never poked.

use ckt_core::Bounds;
use ckt_model::Component;

const GLYPH_WIDTH: i32 = 6;
const LINE_HEIGHT: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    text: String,
}

impl Label {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Component for Label {
    fn name(&self) -> &str {
        "Label"
    }

    fn bounds(&self) -> Bounds {
        let chars = i32::try_from(self.text.chars().count()).unwrap_or(i32::MAX / GLYPH_WIDTH);
        Bounds::from_size(chars.max(1) * GLYPH_WIDTH, LINE_HEIGHT)
    }
}
