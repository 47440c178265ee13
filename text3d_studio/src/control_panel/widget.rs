/// Limits a numeric input enforces on its own, like an HTML `min`/`max`/`step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl NumericRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Typed values are only clamped, never snapped to the step grid.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }

    pub fn step_up(&self, value: f32) -> f32 {
        self.clamp(self.snap(value + self.step))
    }

    pub fn step_down(&self, value: f32) -> f32 {
        self.clamp(self.snap(value - self.step))
    }

    fn snap(&self, value: f32) -> f32 {
        let steps = ((value - self.min) / self.step).round();
        // keep 0.1-style steps printable
        let snapped = self.min + steps * self.step;
        (snapped * 1e4).round() / 1e4
    }
}

pub const FONT_SIZE_INPUT: NumericRange = NumericRange::new(0.0, 2.0, 0.2);
pub const TRANSPARENCY_SLIDER: NumericRange = NumericRange::new(0.0, 1.0, 0.1);
pub const SCALE_INPUT: NumericRange = NumericRange::new(0.0, 1.0, 0.1);

/// Rows of the control panel, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelField {
    #[default]
    Text,
    FontSize,
    Color,
    Transparency,
    Scale,
    Font,
    Animation,
    Export,
}

impl PanelField {
    pub const ALL: [PanelField; 8] = [
        PanelField::Text,
        PanelField::FontSize,
        PanelField::Color,
        PanelField::Transparency,
        PanelField::Scale,
        PanelField::Font,
        PanelField::Animation,
        PanelField::Export,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PanelField::Text => "Text",
            PanelField::FontSize => "Font Size",
            PanelField::Color => "Font Color",
            PanelField::Transparency => "Text Transparency",
            PanelField::Scale => "Text Scaling",
            PanelField::Font => "Font",
            PanelField::Animation => "Animation",
            PanelField::Export => "Export 3D Text",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> PanelField {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> PanelField {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
