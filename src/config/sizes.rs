// Responsive sizing tables - breakpoints, widget size classes and the scale
// each class occupies at each breakpoint. The full mapping is materialized
// once and checked for completeness and invertibility, so a bad table entry
// fails on first use instead of in the middle of a drag.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::grid::Scale;

/// Responsive breakpoints the dashboard reflows across, narrowest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
    #[serde(rename = "2xl")]
    Xxl,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    /// Number of grid columns available at this breakpoint.
    pub fn col_count(self) -> usize {
        match self {
            Breakpoint::Xs | Breakpoint::Sm | Breakpoint::Md => 2,
            Breakpoint::Lg => 3,
            Breakpoint::Xl => 4,
            Breakpoint::Xxl => 5,
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "2xl",
        };
        write!(f, "{}", name)
    }
}

/// Size class a widget declares in its payload. The class is what the remote
/// source speaks; the grid only ever sees the translated [`Scale`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    Small,
    Medium,
    Large,
}

impl WidgetSize {
    pub const ALL: [WidgetSize; 3] = [WidgetSize::Small, WidgetSize::Medium, WidgetSize::Large];

    /// Scale this size class occupies at the given breakpoint.
    pub fn scale_at(self, breakpoint: Breakpoint) -> Scale {
        SIZE_TABLE.scale(self, breakpoint)
    }

    /// Inverse lookup: the size class a placed scale belongs to. `None` for
    /// scales outside the declared vocabulary.
    pub fn from_scale(scale: Scale) -> Option<WidgetSize> {
        SIZE_TABLE.size_for(scale)
    }
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WidgetSize::Small => "small",
            WidgetSize::Medium => "medium",
            WidgetSize::Large => "large",
        };
        write!(f, "{}", name)
    }
}

/// The declared size-class table. Small and medium are the same at every
/// breakpoint; large drops from 3x2 to 2x2 below `lg` where the grid is only
/// two columns wide.
fn declared_scale(size: WidgetSize, breakpoint: Breakpoint) -> Scale {
    match size {
        WidgetSize::Small => Scale::new(1, 1),
        WidgetSize::Medium => Scale::new(2, 1),
        WidgetSize::Large if breakpoint < Breakpoint::Lg => Scale::new(2, 2),
        WidgetSize::Large => Scale::new(3, 2),
    }
}

struct SizeTable {
    scales: BTreeMap<(WidgetSize, Breakpoint), Scale>,
    sizes: BTreeMap<Scale, WidgetSize>,
}

static SIZE_TABLE: Lazy<SizeTable> = Lazy::new(SizeTable::build);

impl SizeTable {
    fn build() -> Self {
        let mut scales = BTreeMap::new();
        let mut sizes: BTreeMap<Scale, WidgetSize> = BTreeMap::new();

        for &size in &WidgetSize::ALL {
            for &breakpoint in &Breakpoint::ALL {
                let scale = declared_scale(size, breakpoint);
                assert!(
                    scale.cols >= 1 && scale.rows >= 1,
                    "degenerate scale {} for {} at {}",
                    scale,
                    size,
                    breakpoint
                );
                assert!(
                    scale.cols <= breakpoint.col_count(),
                    "size {} is {} wide but {} only has {} columns",
                    size,
                    scale.cols,
                    breakpoint,
                    breakpoint.col_count()
                );
                if let Some(prev) = sizes.insert(scale, size) {
                    assert!(
                        prev == size,
                        "scale {} maps to both {} and {}",
                        scale,
                        prev,
                        size
                    );
                }
                scales.insert((size, breakpoint), scale);
            }
        }

        assert_eq!(
            scales.len(),
            WidgetSize::ALL.len() * Breakpoint::ALL.len(),
            "size table is missing entries"
        );

        Self { scales, sizes }
    }

    fn scale(&self, size: WidgetSize, breakpoint: Breakpoint) -> Scale {
        self.scales[&(size, breakpoint)]
    }

    fn size_for(&self, scale: Scale) -> Option<WidgetSize> {
        self.sizes.get(&scale).copied()
    }
}
