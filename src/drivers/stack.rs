// PC Trace — Interrupted Return Address Accessor
//
// Reads one word from the current stack at a fixed word offset.  Called from
// the timer callback, the word at `PC_STACK_OFFSET` is assumed to hold the
// return address of the interrupted code; the offset is relative to the
// callback's own `sp`, not the saved interrupt frame.  Correctness across call depths and optimisation
// levels is the caller's responsibility.

#[cfg(not(target_arch = "riscv32"))]
compile_error!("the stack PC accessor only supports the ESP32-C3 (riscv32)");

/// Word at `sp + offset * 4`.
///
/// # Safety
///
/// `offset` must stay within the current (interrupt) stack.
#[inline(always)]
pub unsafe fn return_address(offset: usize) -> u32 {
    let sp: usize;
    core::arch::asm!("mv {0}, sp", out(reg) sp, options(nomem, nostack, preserves_flags));
    core::ptr::read_volatile((sp as *const u32).add(offset))
}
