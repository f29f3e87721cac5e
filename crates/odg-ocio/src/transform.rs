//! The transform vocabulary written into generated configs.
//!
//! A display colorspace is built from three kinds of step: a matrix for
//! the primaries change, a named builtin for curves and gamut maps, and an
//! exponent for plain gamma. [`Transform::Group`] chains them.

/// `direction:` of a transform. Only `inverse` is ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformDirection {
    /// Apply as defined.
    #[default]
    Forward,
    /// Apply the inverse.
    Inverse,
}

impl TransformDirection {
    /// The other direction.
    #[inline]
    pub fn inverse(self) -> Self {
        if self == Self::Forward { Self::Inverse } else { Self::Forward }
    }

    /// Config token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Inverse => "inverse",
        }
    }
}

/// One transform node.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// `!<MatrixTransform>`
    Matrix(MatrixTransform),
    /// `!<ExponentTransform>`
    Exponent(ExponentTransform),
    /// `!<BuiltinTransform>`
    Builtin(BuiltinTransform),
    /// `!<GroupTransform>`
    Group(GroupTransform),
}

impl Transform {
    /// Forward matrix with zero offset. `m` is row-major.
    pub fn matrix(m: [f64; 16]) -> Self {
        Self::Matrix(MatrixTransform {
            matrix: m,
            offset: [0.0; 4],
            direction: TransformDirection::Forward,
        })
    }

    /// Forward group applying `children` first to last.
    pub fn group(children: Vec<Transform>) -> Self {
        Self::Group(GroupTransform {
            transforms: children,
            direction: TransformDirection::Forward,
        })
    }

    /// Forward builtin named by its OCIO style string.
    pub fn builtin(style: impl Into<String>) -> Self {
        Self::Builtin(BuiltinTransform {
            style: style.into(),
            direction: TransformDirection::Forward,
        })
    }

    /// Forward power function on R, G and B. Alpha is left at 1.
    pub fn exponent(power: f64) -> Self {
        Self::Exponent(ExponentTransform {
            value: [power, power, power, 1.0],
            negative_style: NegativeStyle::Clamp,
            direction: TransformDirection::Forward,
        })
    }

    fn direction_mut(&mut self) -> &mut TransformDirection {
        match self {
            Self::Matrix(t) => &mut t.direction,
            Self::Exponent(t) => &mut t.direction,
            Self::Builtin(t) => &mut t.direction,
            Self::Group(t) => &mut t.direction,
        }
    }

    /// Current direction.
    pub fn direction(&self) -> TransformDirection {
        match self {
            Self::Matrix(t) => t.direction,
            Self::Exponent(t) => t.direction,
            Self::Builtin(t) => t.direction,
            Self::Group(t) => t.direction,
        }
    }

    /// Flips the direction flag. Children of a group are untouched; the
    /// runtime reverses and inverts them when it applies the group.
    pub fn inverse(mut self) -> Self {
        let d = self.direction_mut();
        *d = d.inverse();
        self
    }

    /// Calls `f` with each builtin style, depth-first in application order.
    pub fn for_each_builtin<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Self::Builtin(b) => f(&b.style),
            Self::Group(g) => {
                for child in &g.transforms {
                    child.for_each_builtin(f);
                }
            }
            Self::Matrix(_) | Self::Exponent(_) => {}
        }
    }
}

/// Row-major 4x4 matrix plus RGBA offset.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixTransform {
    /// Coefficients, row-major.
    pub matrix: [f64; 16],
    /// Added after the multiply.
    pub offset: [f64; 4],
    /// Direction.
    pub direction: TransformDirection,
}

impl MatrixTransform {
    /// 4x4 identity.
    pub const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];
}

/// Per-channel power function.
#[derive(Debug, Clone, PartialEq)]
pub struct ExponentTransform {
    /// Exponents for R, G, B, A.
    pub value: [f64; 4],
    /// Treatment of negative inputs.
    pub negative_style: NegativeStyle,
    /// Direction.
    pub direction: TransformDirection,
}

/// How an exponent treats negative input. `Clamp` is the OCIO default and
/// is not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    /// Negatives become zero.
    #[default]
    Clamp,
    /// Odd-symmetric power.
    Mirror,
    /// Negatives are passed unchanged.
    PassThru,
}

impl NegativeStyle {
    /// Config token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Mirror => "mirror",
            Self::PassThru => "pass_thru",
        }
    }
}

/// Ordered chain of transforms.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTransform {
    /// Children, first applied first when forward.
    pub transforms: Vec<Transform>,
    /// Direction.
    pub direction: TransformDirection,
}

/// Transform the OCIO runtime provides under a style name.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinTransform {
    /// Style, e.g. `CURVE - LINEAR_to_ST-2084`.
    pub style: String,
    /// Direction.
    pub direction: TransformDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_inverse_is_forward() {
        let t = Transform::builtin("CURVE - LINEAR_to_HLG");
        assert_eq!(t.clone().inverse().direction(), TransformDirection::Inverse);
        assert_eq!(t.clone().inverse().inverse(), t);
    }

    #[test]
    fn matrix_starts_forward_without_offset() {
        let Transform::Matrix(m) = Transform::matrix(MatrixTransform::IDENTITY) else {
            panic!("expected matrix");
        };
        assert_eq!(m.matrix[5], 1.0);
        assert_eq!(m.offset, [0.0; 4]);
        assert_eq!(m.direction, TransformDirection::Forward);
    }

    #[test]
    fn inverse_gamma_leaves_alpha() {
        let Transform::Exponent(e) = Transform::exponent(2.4).inverse() else {
            panic!("expected exponent");
        };
        assert_eq!(e.value, [2.4, 2.4, 2.4, 1.0]);
        assert_eq!(e.negative_style, NegativeStyle::Clamp);
        assert_eq!(e.direction, TransformDirection::Inverse);
    }

    #[test]
    fn inverted_group_keeps_children() {
        let Transform::Group(g) = Transform::group(vec![
            Transform::builtin("A"),
            Transform::matrix(MatrixTransform::IDENTITY),
        ])
        .inverse() else {
            panic!("expected group");
        };
        assert_eq!(g.direction, TransformDirection::Inverse);
        assert_eq!(g.transforms[0], Transform::builtin("A"));
        assert_eq!(g.transforms[1].direction(), TransformDirection::Forward);
    }

    #[test]
    fn nested_builtins_in_application_order() {
        let g = Transform::group(vec![
            Transform::builtin("GAMUT-MAP - PERCEPTUAL"),
            Transform::matrix(MatrixTransform::IDENTITY),
            Transform::group(vec![Transform::builtin("CURVE - LINEAR_to_ST-2084")]),
        ]);
        let mut styles = Vec::new();
        g.for_each_builtin(&mut |s| styles.push(s));
        assert_eq!(styles, ["GAMUT-MAP - PERCEPTUAL", "CURVE - LINEAR_to_ST-2084"]);
    }
}
