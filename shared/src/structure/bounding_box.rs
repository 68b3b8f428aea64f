use crate::types::BlockPos;

/// Axis-aligned integer box, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl BoundingBox {
    pub fn new(min: BlockPos, max: BlockPos) -> Self {
        Self { min, max }
    }

    /// From `[minX, minY, minZ, maxX, maxY, maxZ]`. Anything but six values is rejected.
    pub fn from_array(values: &[i32]) -> Option<Self> {
        match values {
            [min_x, min_y, min_z, max_x, max_y, max_z] => Some(Self::new(
                BlockPos::new(*min_x, *min_y, *min_z),
                BlockPos::new(*max_x, *max_y, *max_z),
            )),
            _ => None,
        }
    }

    pub fn to_array(&self) -> [i32; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    /// Whether the box overlaps, on the horizontal plane, the square of half-size `range`
    /// centered on `center`.
    pub fn is_within_range(&self, center: &BlockPos, range: i32) -> bool {
        let (cx, cz, range) = (
            i64::from(center.x),
            i64::from(center.z),
            i64::from(range),
        );
        i64::from(self.max.x) >= cx - range
            && i64::from(self.min.x) <= cx + range
            && i64::from(self.max.z) >= cz - range
            && i64::from(self.min.z) <= cz + range
    }
}
