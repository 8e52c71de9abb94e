//! Layout constants.

/// Tiered lineage layout parameters. Sizes are in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Minimum canvas width.
    pub width: f64,
    /// Minimum canvas height.
    pub height: f64,
    pub margin: f64,
    pub node_radius: f64,
    /// Vertical spacing as a multiple of `node_radius`.
    pub vertical_spacing_factor: f64,
    /// Horizontal spacing as a multiple of `node_radius`.
    pub horizontal_spacing_factor: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 800.0,
            margin: 100.0,
            node_radius: 80.0,
            vertical_spacing_factor: 2.5,
            horizontal_spacing_factor: 4.0,
        }
    }
}

impl LayoutConfig {
    pub fn vertical_spacing(&self) -> f64 {
        self.node_radius * self.vertical_spacing_factor
    }

    pub fn horizontal_spacing(&self) -> f64 {
        self.node_radius * self.horizontal_spacing_factor
    }

    pub fn apex_y(&self) -> f64 {
        self.margin
    }

    pub fn base_y(&self) -> f64 {
        self.height - self.margin
    }

    pub fn center_x(&self) -> f64 {
        self.width / 2.0
    }
}

/// Urgency-weighted packing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackingConfig {
    pub width: f64,
    pub height: f64,
    /// Radius of an item with urgency 50.
    pub base_radius: f64,
    pub padding: f64,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            base_radius: 50.0,
            padding: 20.0,
        }
    }
}
