use crate::types::Nothing;

/// A user callable that can be fed the output of its predecessor.
///
/// This is the absence-aware call adapter. `M` is a marker chosen by the
/// compiler from the callable's arity, so the same `then` accepts:
/// - `|| ..` when the predecessor produced [`Nothing`] (the absence value is
///   dropped instead of forwarded),
/// - `|x: T| ..` for any input `T`, including `T = Nothing`,
/// - `|a: A, b: B, ..| ..` when the input is a tuple `(A, B, ..)`, for
///   example the output of a fan-out.
///
/// A callable that returns nothing produces [`Nothing`], so void and
/// value-returning steps compose uniformly.
///
/// Closure parameters must carry type annotations: the marker is resolved by
/// trait selection, which cannot see through an unannotated closure.
pub trait Continuation<In, M>: Send + 'static {
    /// Value produced by the callable.
    type Output: Send + 'static;

    /// Invoke the callable with `input`.
    fn run(self, input: In) -> Self::Output;
}

/// Marker for callables that take no argument and drop an absent input.
#[derive(Debug, Clone, Copy)]
pub struct NoArg;

/// Marker for callables that take the predecessor's output as one argument.
#[derive(Debug, Clone, Copy)]
pub struct WithArg;

/// Marker for callables that take the fields of a tuple input positionally.
#[derive(Debug, Clone, Copy)]
pub struct Spread;

impl<F, R> Continuation<Nothing, NoArg> for F
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    type Output = R;

    #[inline]
    fn run(self, (): Nothing) -> R {
        self()
    }
}

impl<F, T, R> Continuation<T, WithArg> for F
where
    F: FnOnce(T) -> R + Send + 'static,
    R: Send + 'static,
{
    type Output = R;

    #[inline]
    fn run(self, input: T) -> R {
        self(input)
    }
}

macro_rules! impl_spread {
    ($($T:ident),*) => {
        #[allow(non_snake_case)]
        impl<F, R, $($T),*> Continuation<($($T,)*), Spread> for F
        where
            F: FnOnce($($T),*) -> R + Send + 'static,
            R: Send + 'static,
        {
            type Output = R;

            #[inline]
            fn run(self, ($($T,)*): ($($T,)*)) -> R {
                self($($T),*)
            }
        }
    };
}

impl_spread!(A, B);
impl_spread!(A, B, C);
impl_spread!(A, B, C, D);
impl_spread!(A, B, C, D, E);
impl_spread!(A, B, C, D, E, G);
impl_spread!(A, B, C, D, E, G, H);
impl_spread!(A, B, C, D, E, G, H, I);
