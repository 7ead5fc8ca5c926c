//! Seam for the external math renderer.

/// Renders mathematical notation embedded in HTML.
///
/// Receives a whole HTML string and returns it with math delimiters
/// replaced by rendered markup. Closures can be used directly:
///
/// ```
/// use lm_markup::MathRenderer;
///
/// let upper = |html: &str| html.to_uppercase();
/// assert_eq!(upper.render_math("x"), "X");
/// ```
pub trait MathRenderer {
    fn render_math(&self, html: &str) -> String;
}

impl<F> MathRenderer for F
where
    F: Fn(&str) -> String,
{
    fn render_math(&self, html: &str) -> String {
        self(html)
    }
}

/// Leaves math delimiters untouched for a client-side renderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainMath;

impl MathRenderer for PlainMath {
    fn render_math(&self, html: &str) -> String {
        html.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_math_is_identity() {
        assert_eq!(PlainMath.render_math(r"\(x^2\)"), r"\(x^2\)");
    }
}
