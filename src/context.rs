//! The binding environment canonical expressions are evaluated against.
//!
//! An [`EvalContext`] is the only place names come from. The parser resolves
//! every identifier against it and rejects anything it does not hold, so the
//! whitelist is enforced by the environment itself rather than by scanning text.

use crate::error::CalcError;
use crate::functions;
use crate::types::{FunctionName, NativeFunction, TryIntoFunctionName};
use crate::{AngleMode, Real};
use alloc::rc::Rc;

/// Capacity of the function table. Must be a power of two.
pub const MAX_FUNCTIONS: usize = 16;

/// Capacity of the constant table. Must be a power of two.
pub const MAX_CONSTANTS: usize = 4;

pub type NativeFunctionMap = heapless::FnvIndexMap<FunctionName, NativeFunction, MAX_FUNCTIONS>;
pub type ConstantMap = heapless::FnvIndexMap<FunctionName, Real, MAX_CONSTANTS>;

/// Evaluation context: the bound functions and constants, plus the angle mode
/// the trigonometric functions were bound with.
///
/// # Examples
///
/// ```
/// use sci_calc::AngleMode;
/// use sci_calc::context::EvalContext;
/// use sci_calc::engine::interp;
///
/// let ctx = EvalContext::new(AngleMode::Degrees);
/// assert_eq!(interp("FACT(4)+SQRT(9)", &ctx).unwrap(), 27.0);
/// assert!(ctx.get_native_function("SIN").is_some());
/// assert!(ctx.get_native_function("sin").is_none());
/// ```
#[derive(Clone)]
pub struct EvalContext {
    /// Functions callable as `NAME(arg)`.
    pub functions: NativeFunctionMap,
    /// Constants usable as bare names.
    pub constants: ConstantMap,
    angle_mode: AngleMode,
}

impl EvalContext {
    /// Creates the calculator environment: `SIN COS TAN ASIN ACOS ATAN LN LOG
    /// SQRT FACT` and the constants `PI` and `E`, with trigonometry bound to
    /// `mode`.
    pub fn new(mode: AngleMode) -> Self {
        let mut ctx = Self::empty(mode);
        ctx.register_default_math_functions();
        ctx
    }

    /// Creates a context with nothing bound. Every name is unbound in it.
    pub fn empty(mode: AngleMode) -> Self {
        Self {
            functions: NativeFunctionMap::new(),
            constants: ConstantMap::new(),
            angle_mode: mode,
        }
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Registers a one-argument native function.
    ///
    /// Re-registering a name replaces the previous implementation.
    pub fn register_native_function<F>(
        &mut self,
        name: &str,
        implementation: F,
    ) -> Result<(), CalcError>
    where
        F: Fn(Real) -> Real + 'static,
    {
        let key = name.try_into_function_name()?;
        let function = NativeFunction {
            name: key.clone(),
            implementation: Rc::new(implementation),
        };
        self.functions
            .insert(key, function)
            .map(|_| ())
            .map_err(|_| CalcError::CapacityExceeded("functions"))
    }

    /// Binds a constant, returning the value it replaces.
    pub fn set_constant(&mut self, name: &str, value: Real) -> Result<Option<Real>, CalcError> {
        let key = name.try_into_function_name()?;
        self.constants
            .insert(key, value)
            .map_err(|_| CalcError::CapacityExceeded("constants"))
    }

    pub fn get_native_function(&self, name: &str) -> Option<&NativeFunction> {
        let key = name.try_into_function_name().ok()?;
        self.functions.get(&key)
    }

    pub fn get_constant(&self, name: &str) -> Option<Real> {
        let key = name.try_into_function_name().ok()?;
        self.constants.get(&key).copied()
    }

    fn register_default_math_functions(&mut self) {
        let mode = self.angle_mode;
        // The names are short literals and fit the table, so these cannot fail.
        let _ = self.register_native_function("SIN", move |x| functions::sine(x, mode));
        let _ = self.register_native_function("COS", move |x| functions::cosine(x, mode));
        let _ = self.register_native_function("TAN", move |x| functions::tangent(x, mode));
        let _ = self.register_native_function("ASIN", move |x| functions::arc_sine(x, mode));
        let _ = self.register_native_function("ACOS", move |x| functions::arc_cosine(x, mode));
        let _ = self.register_native_function("ATAN", move |x| functions::arc_tangent(x, mode));
        let _ = self.register_native_function("LN", functions::ln);
        let _ = self.register_native_function("LOG", functions::log_10);
        let _ = self.register_native_function("SQRT", functions::square_root);
        let _ = self.register_native_function("FACT", functions::factorial);

        let _ = self.set_constant("PI", crate::constants::PI);
        let _ = self.set_constant("E", crate::constants::E);
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new(AngleMode::default())
    }
}
