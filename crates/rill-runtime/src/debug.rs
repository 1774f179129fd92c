//! Chunk disassembler.
//!
//! Renders bytecode in the classic column format:
//!
//! ```text
//! == <script> ==
//! 0000    1 OP_CONSTANT         0 '1'
//! 0002    | OP_ADD
//! 0003    | OP_PRINT
//! 0004    2 OP_RETURN
//! ```
//!
//! Offsets are four digits, the line column shows `|` when the line is
//! unchanged from the previous instruction, constant operands render the
//! referenced value, and jumps render their resolved target offset. Used
//! by the driver's `--emit-bytecode` mode, by the VM's TRACE logging, and
//! by compiler tests.

use crate::chunk::{Chunk, OpCode};
use crate::object::Heap;

/// Renders a whole chunk under a `== name ==` header.
pub fn disassemble_chunk(chunk: &Chunk, name: &str, heap: &Heap) -> String {
    let mut out = format!("== {} ==\n", name);
    let mut offset = 0;
    while offset < chunk.code.len() {
        let (line, next) = disassemble_instruction(chunk, offset, heap);
        out.push_str(&line);
        out.push('\n');
        offset = next;
    }
    out
}

/// Renders the instruction at `offset`; returns the rendered line and the
/// offset of the next instruction.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize, heap: &Heap) -> (String, usize) {
    let mut line = format!("{:04} ", offset);
    if offset > 0 && chunk.lines[offset] == chunk.lines[offset - 1] {
        line.push_str("   | ");
    } else {
        line.push_str(&format!("{:4} ", chunk.lines[offset]));
    }

    let op = match OpCode::try_from(chunk.code[offset]) {
        Ok(op) => op,
        Err(_) => {
            line.push_str(&format!("unknown opcode {}", chunk.code[offset]));
            return (line, offset + 1);
        }
    };

    let next = match op {
        OpCode::Constant | OpCode::GetGlobal | OpCode::DefineGlobal | OpCode::SetGlobal => {
            let index = chunk.code[offset + 1];
            let value = chunk.constants[index as usize];
            line.push_str(&format!(
                "{:<16} {:4} {}",
                name_of(op),
                index,
                value.display(heap)
            ));
            offset + 2
        }
        OpCode::GetLocal | OpCode::SetLocal | OpCode::Call => {
            let operand = chunk.code[offset + 1];
            line.push_str(&format!("{:<16} {:4}", name_of(op), operand));
            offset + 2
        }
        OpCode::Jump | OpCode::JumpIfFalse => {
            let distance = read_u16(chunk, offset + 1) as usize;
            let target = offset + 3 + distance;
            line.push_str(&format!("{:<16} {:4} -> {}", name_of(op), offset, target));
            offset + 3
        }
        OpCode::Loop => {
            let distance = read_u16(chunk, offset + 1) as usize;
            let target = offset + 3 - distance;
            line.push_str(&format!("{:<16} {:4} -> {}", name_of(op), offset, target));
            offset + 3
        }
        _ => {
            line.push_str(name_of(op));
            offset + 1
        }
    };
    (line, next)
}

fn read_u16(chunk: &Chunk, offset: usize) -> u16 {
    u16::from_be_bytes([chunk.code[offset], chunk.code[offset + 1]])
}

fn name_of(op: OpCode) -> &'static str {
    match op {
        OpCode::Constant => "OP_CONSTANT",
        OpCode::Null => "OP_NULL",
        OpCode::True => "OP_TRUE",
        OpCode::False => "OP_FALSE",
        OpCode::Pop => "OP_POP",
        OpCode::GetLocal => "OP_GET_LOCAL",
        OpCode::SetLocal => "OP_SET_LOCAL",
        OpCode::GetGlobal => "OP_GET_GLOBAL",
        OpCode::DefineGlobal => "OP_DEFINE_GLOBAL",
        OpCode::SetGlobal => "OP_SET_GLOBAL",
        OpCode::Equal => "OP_EQUAL",
        OpCode::Greater => "OP_GREATER",
        OpCode::Less => "OP_LESS",
        OpCode::Add => "OP_ADD",
        OpCode::Subtract => "OP_SUBTRACT",
        OpCode::Multiply => "OP_MULTIPLY",
        OpCode::Divide => "OP_DIVIDE",
        OpCode::Not => "OP_NOT",
        OpCode::Negate => "OP_NEGATE",
        OpCode::Print => "OP_PRINT",
        OpCode::Jump => "OP_JUMP",
        OpCode::JumpIfFalse => "OP_JUMP_IF_FALSE",
        OpCode::Loop => "OP_LOOP",
        OpCode::Call => "OP_CALL",
        OpCode::Return => "OP_RETURN",
    }
}
