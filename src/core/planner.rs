//! # Test Execution Planner Module / 测试执行计划模块
//!
//! This module decides which test cases of a suite are run, honouring the
//! optional `--test` name filter while keeping declaration order.
//!
//! 此模块决定运行测试套件中的哪些用例，
//! 支持可选的 `--test` 名称过滤，同时保持声明顺序。

use crate::core::config::TestCase;
use anyhow::{Result, bail};

/// Represents a complete execution plan for a suite.
/// 表示测试套件的完整执行计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// The test cases to run, in declaration order.
    /// 要执行的测试用例，按声明顺序排列。
    pub cases_to_run: Vec<TestCase>,
    /// The number of cases left out by the name filter.
    /// 被名称过滤排除的用例数量。
    pub filtered_count: usize,
}

/// Creates an execution plan from the suite's cases.
///
/// With an empty `only` list every case runs. Otherwise only the named cases
/// run; naming a case the suite does not contain is an error.
///
/// 根据测试套件的用例创建执行计划。
/// `only` 为空时运行全部用例；否则只运行指定名称的用例，
/// 指定不存在的用例名称会返回错误。
pub fn plan_execution(cases: Vec<TestCase>, only: &[String]) -> Result<ExecutionPlan> {
    if only.is_empty() {
        return Ok(ExecutionPlan {
            cases_to_run: cases,
            filtered_count: 0,
        });
    }

    if let Some(unknown) = only
        .iter()
        .find(|name| !cases.iter().any(|case| &case.name == *name))
    {
        bail!("Unknown test case: '{}'", unknown);
    }

    let total = cases.len();
    let cases_to_run: Vec<_> = cases
        .into_iter()
        .filter(|case| only.iter().any(|name| name == &case.name))
        .collect();

    Ok(ExecutionPlan {
        filtered_count: total - cases_to_run.len(),
        cases_to_run,
    })
}
