// =============================================================================
// FIRMWARE LOGGING SYSTEM - ZERO OVERHEAD
// =============================================================================
//
// Sistema de logging do SLW com custo ZERO em release.
//
// ARQUITETURA:
// - Usa features do Cargo para compile-time filtering
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - SEM core::fmt - Apenas strings literais e valores em hexadecimal
// - SEM alocação
// - A saída vai para um console externo (ConsoleSink), registrado uma vez
//   no boot. Antes do registro, tudo é descartado.
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Erros fatais ou críticos
// - WARN:  Situações suspeitas mas recuperáveis
// - INFO:  Fluxo normal de execução
// - DEBUG: Informações de debugging
// - TRACE: Detalhes extremos (cada acesso XSCOM)
//
// FEATURES:
// - no_logs:   Remove 100% dos logs
// - log_error: Apenas ERROR e WARN
// - log_info:  ERROR, WARN, INFO
// - log_debug: + DEBUG
// - log_trace: Todos os níveis (padrão)
//
// COMO USAR:
//   kinfo!("(SLW) Reinit iniciado");             // Apenas string
//   kinfo!("(SLW) CPU PIR=", pir);              // String + hex
//   klog!("core ", chip, ":", core);             // Múltiplos valores
//
// NOTA: Em SMP as linhas de threads diferentes podem se intercalar.
// Isso é aceitável para debugging.
//
// =============================================================================

/// Destino de bytes do log (driver de console/serial externo).
pub trait ConsoleSink: Sync {
    fn write_str(&self, s: &str);
}

static CONSOLE: spin::Once<&'static dyn ConsoleSink> = spin::Once::new();

/// Registra o console do firmware. Só a primeira chamada tem efeito.
pub fn set_console(sink: &'static dyn ConsoleSink) {
    CONSOLE.call_once(|| sink);
}

#[inline]
pub fn emit_str(s: &str) {
    if let Some(console) = CONSOLE.get() {
        console.write_str(s);
    }
}

#[inline]
pub fn emit_nl() {
    emit_str("\n");
}

/// Envia um valor u64 em formato hexadecimal.
///
/// Formato de saída: 0x0123456789ABCDEF (sempre 18 caracteres)
pub fn emit_hex(value: u64) {
    emit_str(hex_str(value, &mut [0u8; 18]));
}

/// Formata `value` em `buf` como 0x + 16 nibbles maiúsculos.
pub fn hex_str(value: u64, buf: &mut [u8; 18]) -> &str {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

    buf[0] = b'0';
    buf[1] = b'x';
    for i in 0..16 {
        let nibble = (value >> (60 - i * 4)) & 0xF;
        buf[2 + i] = DIGITS[nibble as usize];
    }

    // Só contém ASCII
    ::core::str::from_utf8(&buf[..]).unwrap_or("0x????????????????")
}

// =============================================================================
// PREFIXOS COM CORES ANSI
// =============================================================================

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";

// =============================================================================
// MACRO BASE
// =============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! __klog_line {
    ($prefix:expr, $msg:expr) => {{
        $crate::core::logging::emit_str($prefix);
        $crate::core::logging::emit_str($msg);
        $crate::core::logging::emit_nl();
    }};
    ($prefix:expr, $msg:expr, $val:expr) => {{
        $crate::core::logging::emit_str($prefix);
        $crate::core::logging::emit_str($msg);
        $crate::core::logging::emit_hex($val as u64);
        $crate::core::logging::emit_nl();
    }};
}

// =============================================================================
// MACROS DE LOG - ERROR / WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => { $crate::__klog_line!($crate::core::logging::P_ERROR, $($t)*) };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => { $crate::__klog_line!($crate::core::logging::P_WARN, $($t)*) };
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - INFO
// =============================================================================

#[cfg(not(any(feature = "no_logs", feature = "log_error")))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => { $crate::__klog_line!($crate::core::logging::P_INFO, $($t)*) };
}

#[cfg(any(feature = "no_logs", feature = "log_error"))]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - DEBUG / TRACE
// =============================================================================

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_trace", feature = "log_debug")
))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => { $crate::__klog_line!($crate::core::logging::P_DEBUG, $($t)*) };
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_trace", feature = "log_debug")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => { $crate::__klog_line!($crate::core::logging::P_TRACE, $($t)*) };
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS AUXILIARES
// =============================================================================

/// klog! - Log genérico sem prefixo de nível nem newline.
///
/// # Uso
/// ```ignore
/// klog!("core ", chip, ":", core);
/// knl!();
/// ```
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! klog {
    ($msg:expr) => {{
        $crate::core::logging::emit_str($msg);
    }};
    ($msg:expr, $val:expr) => {{
        $crate::core::logging::emit_str($msg);
        $crate::core::logging::emit_hex($val as u64);
    }};
    ($msg1:expr, $val1:expr, $msg2:expr, $val2:expr) => {{
        $crate::core::logging::emit_str($msg1);
        $crate::core::logging::emit_hex($val1 as u64);
        $crate::core::logging::emit_str($msg2);
        $crate::core::logging::emit_hex($val2 as u64);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! klog {
    ($($t:tt)*) => {{}};
}

/// knl! - Emite apenas newline.
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! knl {
    () => {{
        $crate::core::logging::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! knl {
    () => {{}};
}

// =============================================================================
// MACROS DE STATUS (OK/FAIL)
// =============================================================================

/// kok! - Log de sucesso (prefixo verde [OK]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($msg:expr) => {{
        $crate::core::logging::emit_str("\x1b[32m[OK]\x1b[0m ");
        $crate::core::logging::emit_str($msg);
        $crate::core::logging::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}

/// kfail! - Log de falha (prefixo vermelho [FAIL]).
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kfail {
    ($msg:expr) => {{
        $crate::core::logging::emit_str("\x1b[1;31m[FAIL]\x1b[0m ");
        $crate::core::logging::emit_str($msg);
        $crate::core::logging::emit_nl();
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kfail {
    ($($t:tt)*) => {{}};
}
