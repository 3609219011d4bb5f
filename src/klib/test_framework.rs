//! Framework de self-test do firmware

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Executa suite de testes. Retorna (passed, failed, skipped).
pub fn run_test_suite(name: &'static str, tests: &[TestCase]) -> (usize, usize, usize) {
    crate::kinfo!("=== Executando suite:");
    crate::klog!(name);
    crate::knl!();

    let mut passed = 0;
    let mut failed = 0;
    let mut skipped = 0;

    for test in tests {
        let result = (test.func)();
        match result {
            TestResult::Passed => {
                crate::klog!("[PASS] ");
                passed += 1;
            }
            TestResult::Failed => {
                crate::klog!("[FAIL] ");
                failed += 1;
            }
            TestResult::Skipped => {
                crate::klog!("[SKIP] ");
                skipped += 1;
            }
        }
        crate::klog!(test.name);
        crate::knl!();
    }

    crate::kinfo!("Resultados: passed=", passed);
    if failed > 0 {
        crate::kerror!("Resultados: failed=", failed);
    }
    (passed, failed, skipped)
}
