//! Bytecode emission helpers.
//!
//! Everything funnels through `emit_byte`, which stamps each byte with
//! the line of the token that caused it, so runtime errors and the
//! disassembler can point back at source lines.

use rill_runtime::{Chunk, OpCode, Value};

use crate::parser::Parser;

impl<'src, 'ctx> Parser<'src, 'ctx> {
    pub(crate) fn current_chunk(&mut self) -> &mut Chunk {
        &mut self.compiler.function.chunk
    }

    pub(crate) fn emit_byte(&mut self, byte: u8) {
        let line = self.previous.line;
        self.current_chunk().write(byte, line);
    }

    pub(crate) fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op.into());
    }

    pub(crate) fn emit_ops(&mut self, first: OpCode, second: OpCode) {
        self.emit_op(first);
        self.emit_op(second);
    }

    pub(crate) fn emit_op_byte(&mut self, op: OpCode, operand: u8) {
        self.emit_op(op);
        self.emit_byte(operand);
    }

    /// The implicit function epilogue: every body ends by returning null.
    pub(crate) fn emit_return(&mut self) {
        self.emit_ops(OpCode::Null, OpCode::Return);
    }

    /// Adds a constant and emits the instruction pushing it.
    pub(crate) fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_op_byte(OpCode::Constant, index);
    }

    /// Adds a constant to the current chunk's pool, enforcing the
    /// one-byte index encoding.
    pub(crate) fn make_constant(&mut self, value: Value) -> u8 {
        let index = self.current_chunk().add_constant(value);
        if index > usize::from(u8::MAX) {
            self.error("Too many constants in one chunk.");
            return 0;
        }
        index as u8
    }

    /// Emits a forward jump with a two-byte placeholder distance and
    /// returns the placeholder's offset for later patching.
    pub(crate) fn emit_jump(&mut self, op: OpCode) -> usize {
        self.emit_op(op);
        self.emit_byte(0xff);
        self.emit_byte(0xff);
        self.current_chunk().code.len() - 2
    }

    /// Backpatches a jump to land just past the current end of code.
    pub(crate) fn patch_jump(&mut self, offset: usize) {
        // Distance is measured from past the two placeholder bytes.
        let distance = self.current_chunk().code.len() - offset - 2;
        if distance > usize::from(u16::MAX) {
            self.error("Too much code to jump over.");
        }
        let [high, low] = (distance as u16).to_be_bytes();
        self.current_chunk().code[offset] = high;
        self.current_chunk().code[offset + 1] = low;
    }

    /// Emits a backward jump to `loop_start`.
    pub(crate) fn emit_loop(&mut self, loop_start: usize) {
        self.emit_op(OpCode::Loop);

        // +2 covers the distance operand itself.
        let distance = self.current_chunk().code.len() - loop_start + 2;
        if distance > usize::from(u16::MAX) {
            self.error("Loop body too large.");
        }
        let [high, low] = (distance as u16).to_be_bytes();
        self.emit_byte(high);
        self.emit_byte(low);
    }
}

#[cfg(test)]
mod tests {
    use crate::compile;
    use rill_runtime::{Heap, OpCode};
    use rill_util::Handler;

    fn chunk_bytes(source: &str) -> Vec<u8> {
        let mut heap = Heap::new();
        let mut handler = Handler::silent();
        let function = compile(source, &mut heap, &mut handler).expect("compiles");
        heap.function(function).chunk.code.clone()
    }

    #[test]
    fn test_if_jump_lands_on_else_pop() {
        // Layout: True, JumpIfFalse hi lo, Pop, Constant k, Print,
        //         Jump hi lo, Pop, Null, Return
        let code = chunk_bytes("if (true) print 1;");
        assert_eq!(code[0], u8::from(OpCode::True));
        assert_eq!(code[1], u8::from(OpCode::JumpIfFalse));

        // The VM reads the distance with its ip just past the operand
        // bytes (offset 4); the patched target is the else-side Pop.
        let distance = u16::from_be_bytes([code[2], code[3]]) as usize;
        let target = 4 + distance;
        assert_eq!(code[target], u8::from(OpCode::Pop));
        assert_eq!(code[target - 3], u8::from(OpCode::Jump));
    }

    #[test]
    fn test_loop_jumps_back_to_condition() {
        // Layout: False@0, JumpIfFalse, Pop, Constant, Print, Loop@8
        let code = chunk_bytes("while (false) print 1;");
        assert_eq!(code[0], u8::from(OpCode::False));
        assert_eq!(code[8], u8::from(OpCode::Loop));

        let distance = u16::from_be_bytes([code[9], code[10]]) as usize;
        // Backward distance is taken from past the operand bytes.
        assert_eq!(8 + 3 - distance, 0);
    }

    #[test]
    fn test_jump_distance_limit() {
        // Each `t = t;` on a local is 5 bytes (GetLocal, SetLocal, Pop)
        // with no constants, so the then-branch length is controllable:
        // distance = 1 (Pop) + 5n + 3 (Jump). n = 13106 stays within the
        // 16-bit distance; n = 13107 crosses it.
        fn nested_ifs(statements: usize) -> String {
            let mut source = String::from("{ let t = 0; if (t) { ");
            for _ in 0..statements {
                source.push_str("t = t;");
            }
            source.push_str("} }");
            source
        }

        let mut heap = Heap::new();
        let mut handler = Handler::silent();
        assert!(compile(&nested_ifs(13106), &mut heap, &mut handler).is_ok());

        let mut heap = Heap::new();
        let mut handler = Handler::silent();
        assert!(compile(&nested_ifs(13107), &mut heap, &mut handler).is_err());
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message == "Too much code to jump over."));
    }

    #[test]
    fn test_loop_distance_limit() {
        fn wide_while(statements: usize) -> String {
            let mut source = String::from("{ let t = 0; while (t) { ");
            for _ in 0..statements {
                source.push_str("t = t;");
            }
            source.push_str("} }");
            source
        }

        let mut heap = Heap::new();
        let mut handler = Handler::silent();
        assert!(compile(&wide_while(13000), &mut heap, &mut handler).is_ok());

        let mut heap = Heap::new();
        let mut handler = Handler::silent();
        assert!(compile(&wide_while(13110), &mut heap, &mut handler).is_err());
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message == "Loop body too large."));
    }

    #[test]
    fn test_jump_operand_is_big_endian() {
        // Pad the then-branch past 255 bytes so the high byte is nonzero.
        let mut body = String::from("if (true) { ");
        for _ in 0..100 {
            body.push_str("print 1;");
        }
        body.push('}');
        let code = chunk_bytes(&body);

        assert_eq!(code[1], u8::from(OpCode::JumpIfFalse));
        let distance = u16::from_be_bytes([code[2], code[3]]);
        assert!(distance > 255, "distance {distance} should need two bytes");
        assert_ne!(code[2], 0, "high byte must be significant");
    }
}
