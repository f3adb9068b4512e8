use super::TypedFunction;
use crate::context::FunctionContext;
use crate::expression::Expression;
use crate::types::{Parameter, Type};
use crate::values::FunctionReturn;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Fade time used when `smooth` is called without one, in seconds.
pub const DEFAULT_FADE_TIME: f32 = 1.0;

/// Host-driven frame clock read by stateful built-ins.
#[derive(Debug, Default)]
pub struct FrameTimer {
    last_frame_time: AtomicU32,
}

impl FrameTimer {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records how long the frame that just ended took, in seconds.
    pub fn set_last_frame_time(&self, seconds: f32) {
        self.last_frame_time
            .store(seconds.to_bits(), Ordering::Relaxed);
    }

    pub fn last_frame_time(&self) -> f32 {
        f32::from_bits(self.last_frame_time.load(Ordering::Relaxed))
    }
}

/// `smooth(value[, fade_up[, fade_down]])`: eases toward `value`, covering
/// 99% of the distance within the fade time.
///
/// Every resolution gets a fresh instance, so each call site keeps its own
/// state.
#[derive(Debug)]
pub struct SmoothFloat {
    timer: Arc<FrameTimer>,
    parameters: Box<[Parameter]>,
    value: AtomicU32,
    started: AtomicBool,
}

impl SmoothFloat {
    /// `arity` is 1 (value only), 2 (one fade time) or 3 (fade up, fade down).
    pub fn new(timer: Arc<FrameTimer>, arity: usize) -> Self {
        debug_assert!((1..=3).contains(&arity));
        let mut parameters = vec![Parameter::new(Type::Float)];
        parameters.extend((1..arity).map(|_| Parameter::constant(Type::Float)));
        Self {
            timer,
            parameters: parameters.into_boxed_slice(),
            value: AtomicU32::new(0),
            started: AtomicBool::new(false),
        }
    }

    fn step(&self, target: f32, fade_up: f32, fade_down: f32) -> f32 {
        if !self.started.swap(true, Ordering::Relaxed) {
            return target;
        }
        let previous = f32::from_bits(self.value.load(Ordering::Relaxed));
        let fade = if target > previous { fade_up } else { fade_down };
        if fade <= 0.0 {
            return target;
        }
        let factor = 1.0 - 0.01f32.powf(self.timer.last_frame_time() / fade);
        previous + (target - previous) * factor
    }
}

impl TypedFunction for SmoothFloat {
    fn return_type(&self) -> Type {
        Type::Float
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn is_pure(&self) -> bool {
        false
    }

    fn evaluate_to(
        &self,
        params: &[Box<dyn Expression>],
        context: &dyn FunctionContext,
        ret: &mut FunctionReturn,
    ) {
        params[0].evaluate_to(context, ret);
        let target = ret.float_return;
        let fade_up = match params.get(1) {
            Some(param) => {
                param.evaluate_to(context, ret);
                ret.float_return
            }
            None => DEFAULT_FADE_TIME,
        };
        let fade_down = match params.get(2) {
            Some(param) => {
                param.evaluate_to(context, ret);
                ret.float_return
            }
            None => fade_up,
        };

        let value = self.step(target, fade_up, fade_down);
        self.value.store(value.to_bits(), Ordering::Relaxed);
        ret.float_return = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BasicFunctionContext;
    use crate::expression::ConstantExpression;

    fn run(smooth: &SmoothFloat, params: &[Box<dyn Expression>]) -> f32 {
        let mut ret = FunctionReturn::default();
        smooth.evaluate_to(params, &BasicFunctionContext::new(), &mut ret);
        ret.float_return
    }

    #[test]
    fn test_first_evaluation_jumps_to_target() {
        let smooth = SmoothFloat::new(FrameTimer::shared(), 1);
        let params: [Box<dyn Expression>; 1] = [Box::new(ConstantExpression::Float(4.0))];
        assert_eq!(run(&smooth, &params), 4.0);
    }

    #[test]
    fn test_full_fade_time_covers_99_percent() {
        let timer = FrameTimer::shared();
        let smooth = SmoothFloat::new(Arc::clone(&timer), 2);

        let start: [Box<dyn Expression>; 2] = [
            Box::new(ConstantExpression::Float(0.0)),
            Box::new(ConstantExpression::Float(2.0)),
        ];
        assert_eq!(run(&smooth, &start), 0.0);

        timer.set_last_frame_time(2.0);
        let target: [Box<dyn Expression>; 2] = [
            Box::new(ConstantExpression::Float(100.0)),
            Box::new(ConstantExpression::Float(2.0)),
        ];
        let value = run(&smooth, &target);
        assert!((value - 99.0).abs() < 1e-3, "got {value}");
    }

    #[test]
    fn test_fade_down_is_used_when_decreasing() {
        let timer = FrameTimer::shared();
        let smooth = SmoothFloat::new(Arc::clone(&timer), 3);
        let params = |value: f32| -> [Box<dyn Expression>; 3] {
            [
                Box::new(ConstantExpression::Float(value)),
                Box::new(ConstantExpression::Float(10.0)),
                Box::new(ConstantExpression::Float(0.0)),
            ]
        };

        run(&smooth, &params(5.0));
        timer.set_last_frame_time(0.1);
        // Zero fade-down time: falling values snap immediately.
        assert_eq!(run(&smooth, &params(1.0)), 1.0);
        // Rising values ease in slowly.
        let rising = run(&smooth, &params(2.0));
        assert!(rising > 1.0 && rising < 1.1, "got {rising}");
    }

    #[test]
    fn test_fade_parameters_must_be_constant() {
        let smooth = SmoothFloat::new(FrameTimer::shared(), 3);
        assert_eq!(
            smooth.parameters(),
            &[
                Parameter::new(Type::Float),
                Parameter::constant(Type::Float),
                Parameter::constant(Type::Float),
            ]
        );
        assert!(!smooth.is_pure());
    }
}
