use crate::card::config::TitleScale;

impl TitleScale {
    /// Font size for a title of `len_chars` characters.
    ///
    /// Every length maps to a size: lengths past the last step fall into `floor_px`.
    pub fn font_size_for_len(&self, len_chars: usize) -> f32 {
        self.steps
            .iter()
            .find(|s| len_chars <= s.max_chars)
            .map(|s| s.size_px)
            .unwrap_or(self.floor_px)
    }

    /// Font size for `title`, counted in Unicode scalar values.
    pub fn font_size_for(&self, title: &str) -> f32 {
        self.font_size_for_len(title.chars().count())
    }

    /// Line-height ratio for a font size; larger sizes get tighter ratios.
    pub fn line_height_for(&self, size_px: f32) -> f32 {
        self.line_heights
            .iter()
            .find(|s| size_px >= s.min_size_px)
            .map(|s| s.ratio)
            .unwrap_or(self.base_line_height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/sizing.rs"]
mod tests;
