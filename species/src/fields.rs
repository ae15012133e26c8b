use crate::{Result, SpeciesError};

/// Read-only view over the interpolated electromagnetic fields of one
/// particle range.
///
/// The host interpolator hands each worker a contiguous array in the layout
/// `[Ex over particles][Ey ...][Ez ...]` of length `3 · n`, indexed by the
/// absolute particle index minus `ipart_ref`. The view preserves that offset
/// convention.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    e: &'a [f64],
    b: &'a [f64],
    stride: usize,
    ipart_ref: usize,
}

impl<'a> FieldView<'a> {
    pub fn new(e: &'a [f64], b: &'a [f64], ipart_ref: usize) -> Result<Self> {
        if e.len() % 3 != 0 {
            return Err(SpeciesError::FieldLayout { len: e.len() });
        }
        if b.len() != e.len() {
            return Err(SpeciesError::LengthMismatch {
                expected: e.len(),
                found: b.len(),
            });
        }
        Ok(Self {
            e,
            b,
            stride: e.len() / 3,
            ipart_ref,
        })
    }

    #[inline]
    pub fn ex(&self, ipart: usize) -> f64 {
        self.e[ipart - self.ipart_ref]
    }

    #[inline]
    pub fn ey(&self, ipart: usize) -> f64 {
        self.e[self.stride + ipart - self.ipart_ref]
    }

    #[inline]
    pub fn ez(&self, ipart: usize) -> f64 {
        self.e[2 * self.stride + ipart - self.ipart_ref]
    }

    #[inline]
    pub fn bx(&self, ipart: usize) -> f64 {
        self.b[ipart - self.ipart_ref]
    }

    #[inline]
    pub fn by(&self, ipart: usize) -> f64 {
        self.b[self.stride + ipart - self.ipart_ref]
    }

    #[inline]
    pub fn bz(&self, ipart: usize) -> f64 {
        self.b[2 * self.stride + ipart - self.ipart_ref]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_layout_validation() {
        let e = [0.0; 7];
        let b = [0.0; 7];
        FieldView::new(&e, &b, 0).unwrap_err();

        let e = [0.0; 6];
        let b = [0.0; 3];
        FieldView::new(&e, &b, 0).unwrap_err();
    }

    fn sample() -> ([f64; 6], [f64; 6]) {
        ([1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [
            -1.0, -2.0, -3.0, -4.0, -5.0, -6.0,
        ])
    }

    #[test]
    fn test_component_layout() {
        let (e, b) = sample();
        let view = FieldView::new(&e, &b, 0).unwrap();
        assert_eq!(view.ex(1), 2.0);
        assert_eq!(view.ey(0), 3.0);
        assert_eq!(view.ez(1), 6.0);
        assert_eq!(view.bx(0), -1.0);
        assert_eq!(view.bz(0), -5.0);
    }

    #[test]
    fn test_reference_offset() {
        let (e, b) = sample();
        let view = FieldView::new(&e, &b, 10).unwrap();
        assert_eq!(view.ex(10), 1.0);
        assert_eq!(view.ey(11), 4.0);
    }
}
