//! # Variable slots
//!
//! Expressions reference one of 27 fixed variable slots: the letters `a`..`z`
//! plus the extra slot `z1`. Numbers are bound to slots through a
//! [`VariableTable`]. Every evaluation reads one table:
//! - an explicit table passed to [`Expr::eval_with`](crate::symbolic::symbolic_engine::Expr::eval_with)
//! - or the thread-confined global table read by
//!   [`Expr::evaluate`](crate::symbolic::symbolic_engine::Expr::evaluate).
//!
//! The global table is written with [`set_value`] or, preferably, with
//! [`bind`], whose guard restores the previous value when it goes out of scope.
//! It is one table per thread: two threads never race on it, but two
//! evaluations on the same thread see each other's bindings until the next
//! write.

use std::cell::RefCell;
use std::marker::PhantomData;

use strum::EnumCount;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter, EnumString};

/// One of the 27 named variable slots.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    EnumCountMacro,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Variable {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Z1,
}

impl Variable {
    /// index of the slot inside a [`VariableTable`]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Slot pattern used by membership queries. `Any` matches every slot and is
/// never bindable, since tables only accept a concrete [`Variable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableMatch {
    Slot(Variable),
    Any,
}

impl From<Variable> for VariableMatch {
    fn from(variable: Variable) -> Self {
        VariableMatch::Slot(variable)
    }
}

/// Numeric value of every slot. Unset slots read as 0.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableTable {
    values: [f64; Variable::COUNT],
}

impl Default for VariableTable {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableTable {
    pub fn new() -> Self {
        Self {
            values: [0.0; Variable::COUNT],
        }
    }

    /// builder form of [`VariableTable::set_value`]
    pub fn with(mut self, variable: Variable, value: f64) -> Self {
        self.set_value(variable, value);
        self
    }

    pub fn set_value(&mut self, variable: Variable, value: f64) {
        self.values[variable.index()] = value;
    }

    pub fn get_value(&self, variable: Variable) -> f64 {
        self.values[variable.index()]
    }

    /// set every slot back to 0
    pub fn reset(&mut self) {
        self.values = [0.0; Variable::COUNT];
    }
}

thread_local! {
    static GLOBAL_TABLE: RefCell<VariableTable> = RefCell::new(VariableTable::new());
}

/// Overwrite the value bound to `variable` in this thread's global table.
pub fn set_value(variable: Variable, value: f64) {
    GLOBAL_TABLE.with(|table| table.borrow_mut().set_value(variable, value));
}

/// Read the value bound to `variable` in this thread's global table.
pub fn get_value(variable: Variable) -> f64 {
    GLOBAL_TABLE.with(|table| table.borrow().get_value(variable))
}

/// Run `f` against a read-only view of this thread's global table.
pub fn with_global_table<R>(f: impl FnOnce(&VariableTable) -> R) -> R {
    GLOBAL_TABLE.with(|table| f(&table.borrow()))
}

/// Set every slot of this thread's global table back to 0.
pub fn reset_global_table() {
    GLOBAL_TABLE.with(|table| table.borrow_mut().reset());
}

/// Binds `variable` to `value` in the global table and returns a guard that
/// restores the previous value when dropped.
///
/// ```
/// use FrenetSciThe::symbolic::variables::{bind, get_value, Variable};
/// {
///     let _r = bind(Variable::R, 2.0);
///     assert_eq!(get_value(Variable::R), 2.0);
/// }
/// assert_eq!(get_value(Variable::R), 0.0);
/// ```
pub fn bind(variable: Variable, value: f64) -> BindingGuard {
    let previous = get_value(variable);
    set_value(variable, value);
    BindingGuard {
        variable,
        previous,
        _thread_bound: PhantomData,
    }
}

/// Scoped binding created by [`bind`]. Not `Send`: it must be dropped on the
/// thread whose table it modified.
#[must_use = "the binding is undone as soon as the guard is dropped"]
pub struct BindingGuard {
    variable: Variable,
    previous: f64,
    _thread_bound: PhantomData<*const ()>,
}

impl BindingGuard {
    pub fn variable(&self) -> Variable {
        self.variable
    }
}

impl Drop for BindingGuard {
    fn drop(&mut self) {
        // the table may already be gone while the thread shuts down
        let _ = GLOBAL_TABLE.try_with(|table| {
            table.borrow_mut().set_value(self.variable, self.previous);
        });
    }
}
