//! Running L-BFGS on a [`LogLikelihood`].
//!
//! [`maximize`] is the entry point: it checks the starting logits, picks the
//! solver for `opts.line_searcher`, and hands both to a shared executor loop
//! that turns Argmin's final state into an [`OptimOutcome`].
use argmin::core::{CostFunction, Executor, Gradient, IterState, Solver, State};
use argmin_math::ArgminL2Norm;
use tracing::debug;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        Grad, LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Theta,
    },
};

type LbfgsState = IterState<Theta, Grad, (), (), (), f64>;

/// Maximize `ℓ(θ)` from `theta0` with L-BFGS.
///
/// # Errors
/// - Errors from `f.check(theta0, data)`.
/// - Solver construction errors (tolerances rejected by Argmin).
/// - Runtime errors: line-search failures and errors raised by `ℓ` or `∇ℓ`.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    if opts.verbose {
        log_start(&theta0, &problem)?;
    }
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            execute(theta0, opts, problem, build_optimizer_more_thuente(opts)?)
        }
        LineSearcher::HagerZhang => {
            execute(theta0, opts, problem, build_optimizer_hager_zhang(opts)?)
        }
    }
}

fn execute<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, LbfgsState> + Send + 'static,
{
    let max_iter = opts.tols.max_iter;
    let executor = Executor::new(problem, solver).configure(|state| {
        let state = state.param(theta0);
        match max_iter {
            Some(cap) => state.max_iters(cap as u64),
            None => state,
        }
    });
    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        )
    } else {
        executor
    };

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    if opts.verbose {
        debug!(iterations, status = ?termination, "l-bfgs finished");
    }
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        termination,
        iterations,
        fn_evals,
        grad,
    )
}

fn log_start<F: LogLikelihood>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()> {
    let log_lik = -problem.cost(theta0)?;
    let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    debug!(log_lik, grad_norm = ?grad_norm, dim = theta0.len(), "l-bfgs starting point");
    Ok(())
}
