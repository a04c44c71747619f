use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::grid::BingoGrid;
use crate::input::gesture::{GestureConfigError, ZoomLimits};

/// Board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub size: usize,
}

impl GridSettings {
    pub const DEFAULT_SIZE: usize = 5;
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// Zoom bounds and the step used by zoom buttons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ZoomSettings {
    pub const DEFAULT_STEP: f32 = 0.1;

    pub fn limits(&self) -> Result<ZoomLimits, GestureConfigError> {
        ZoomLimits::new(self.min, self.max)
    }
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            min: ZoomLimits::DEFAULT_MIN,
            max: ZoomLimits::DEFAULT_MAX,
            step: Self::DEFAULT_STEP,
        }
    }
}

/// Layout and font settings for the board renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub cell_px: f32,
    pub gap_px: f32,
    /// TTF/OTF font used for cell labels; labels are skipped without one
    pub font_path: Option<std::path::PathBuf>,
}

impl RenderSettings {
    pub const DEFAULT_CELL: f32 = 160.0;
    pub const DEFAULT_GAP: f32 = 6.0;
    pub const MIN_CELL_LIMIT: f32 = 32.0;
    pub const MAX_CELL_LIMIT: f32 = 512.0;

    pub fn sanitize_cell_dimension(value: f32) -> f32 {
        if value.is_finite() {
            value.clamp(Self::MIN_CELL_LIMIT, Self::MAX_CELL_LIMIT)
        } else {
            Self::DEFAULT_CELL
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            cell_px: Self::DEFAULT_CELL,
            gap_px: Self::DEFAULT_GAP,
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Grid size {size} is outside {min}..={max}")]
    GridSize { size: usize, min: usize, max: usize },
    #[error("Invalid zoom bounds: {0}")]
    Zoom(#[from] GestureConfigError),
    #[error("Zoom step {0} must be finite and positive")]
    ZoomStep(f32),
    #[error("Cell gap {gap} must be non-negative and smaller than the cell size {cell}")]
    Gap { gap: f32, cell: f32 },
}

impl GridSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(BingoGrid::MIN_SIZE..=BingoGrid::MAX_SIZE).contains(&self.size) {
            return Err(SettingsError::GridSize {
                size: self.size,
                min: BingoGrid::MIN_SIZE,
                max: BingoGrid::MAX_SIZE,
            });
        }
        Ok(())
    }
}

impl ZoomSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.limits()?;
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SettingsError::ZoomStep(self.step));
        }
        Ok(())
    }
}

impl RenderSettings {
    /// Clamps the cell size into range and checks the gap against it
    pub fn sanitized(&self) -> Result<Self, SettingsError> {
        let cell = Self::sanitize_cell_dimension(self.cell_px);
        if !self.gap_px.is_finite() || self.gap_px < 0.0 || self.gap_px * 2.0 >= cell {
            return Err(SettingsError::Gap { gap: self.gap_px, cell });
        }
        Ok(Self {
            cell_px: cell,
            gap_px: self.gap_px,
            font_path: self.font_path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GridSettings::default().validate().is_ok());
        assert!(ZoomSettings::default().validate().is_ok());
        assert!(RenderSettings::default().sanitized().is_ok());
    }

    #[test]
    fn grid_size_bounds() {
        assert!(GridSettings { size: 3 }.validate().is_ok());
        assert!(GridSettings { size: 4 }.validate().is_ok());
        assert!(matches!(
            GridSettings { size: 1 }.validate(),
            Err(SettingsError::GridSize { size: 1, .. })
        ));
        assert!(GridSettings { size: 16 }.validate().is_err());
    }

    #[test]
    fn zoom_validation() {
        let inverted = ZoomSettings { min: 2.0, max: 1.0, step: 0.1 };
        assert!(matches!(inverted.validate(), Err(SettingsError::Zoom(_))));

        let bad_step = ZoomSettings { step: 0.0, ..ZoomSettings::default() };
        assert!(matches!(bad_step.validate(), Err(SettingsError::ZoomStep(_))));
    }

    #[test]
    fn cell_dimension_is_clamped() {
        assert_eq!(RenderSettings::sanitize_cell_dimension(4.0), RenderSettings::MIN_CELL_LIMIT);
        assert_eq!(RenderSettings::sanitize_cell_dimension(9000.0), RenderSettings::MAX_CELL_LIMIT);
        assert_eq!(RenderSettings::sanitize_cell_dimension(f32::NAN), RenderSettings::DEFAULT_CELL);
    }

    #[test]
    fn gap_must_leave_room_for_cell() {
        let settings = RenderSettings {
            cell_px: 40.0,
            gap_px: 20.0,
            font_path: None,
        };
        assert!(matches!(settings.sanitized(), Err(SettingsError::Gap { .. })));
    }
}
