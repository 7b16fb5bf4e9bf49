//! Performance benchmarks for the nescore emulation core.
//!
//! Measures CPU stepping, PPU frame rendering, full console operation, and
//! memory access across the mappers this core implements.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nescore::Console;
use std::time::Duration;

/// Build a minimal valid NROM (mapper 0) ROM: an infinite `JMP $8000` loop.
fn create_minimal_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 16 + 32768 + 8192];

    rom[0] = 0x4E;
    rom[1] = 0x45;
    rom[2] = 0x53;
    rom[3] = 0x1A;
    rom[4] = 2; // 32KB PRG-ROM
    rom[5] = 1; // 8KB CHR-ROM
    rom[6] = 0x01; // mapper 0, vertical mirroring

    rom[16 + 0x7FFC] = 0x00;
    rom[16 + 0x7FFD] = 0x80;

    rom[16] = 0x4C; // JMP absolute
    rom[17] = 0x00;
    rom[18] = 0x80;

    rom
}

/// Build a minimal mapper 1 (MMC1) ROM with the same infinite loop, two PRG
/// banks so bank-switching registers actually see writes exercised.
fn create_mmc1_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 16 + 2 * 16384 + 8192];

    rom[0] = 0x4E;
    rom[1] = 0x45;
    rom[2] = 0x53;
    rom[3] = 0x1A;
    rom[4] = 2; // 32KB PRG-ROM
    rom[5] = 1; // 8KB CHR-ROM
    rom[6] = 0x10; // mapper 1 low nibble

    let last_bank = 16 + 16384;
    rom[last_bank + 0x3FFC] = 0x00;
    rom[last_bank + 0x3FFD] = 0xC0;
    rom[last_bank] = 0x4C;
    rom[last_bank + 1] = 0x00;
    rom[last_bank + 2] = 0xC0;

    rom
}

/// Build a minimal mapper 4 (MMC3) ROM with the same infinite loop.
fn create_mmc3_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 16 + 4 * 8192 + 8192];

    rom[0] = 0x4E;
    rom[1] = 0x45;
    rom[2] = 0x53;
    rom[3] = 0x1A;
    rom[4] = 2; // 32KB PRG-ROM (4 x 8KB banks)
    rom[5] = 1; // 8KB CHR-ROM
    rom[6] = 0x40; // mapper 4 low nibble

    let last_bank = 16 + 3 * 8192;
    rom[last_bank + 0x1FFC] = 0x00;
    rom[last_bank + 0x1FFD] = 0xE0;
    rom[last_bank] = 0x4C;
    rom[last_bank + 1] = 0x00;
    rom[last_bank + 2] = 0xE0;

    rom
}

fn bench_cpu_instructions(c: &mut Criterion) {
    let rom_data = create_minimal_rom();
    let mut console = Console::new(&rom_data).expect("failed to create console");
    console.power_on();

    let mut group = c.benchmark_group("cpu");
    group.throughput(Throughput::Elements(1));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("single_tick", |b| {
        b.iter(|| {
            black_box(console.step());
        });
    });

    group.bench_function("1000_ticks", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(console.step());
            }
        });
    });

    group.finish();
}

fn bench_ppu_frames(c: &mut Criterion) {
    let rom_data = create_minimal_rom();
    let mut console = Console::new(&rom_data).expect("failed to create console");
    console.power_on();

    let mut group = c.benchmark_group("ppu");
    group.throughput(Throughput::Elements(1));
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("single_frame", |b| {
        b.iter(|| {
            console.step_frame();
            black_box(console.framebuffer());
        });
    });

    group.finish();
}

fn bench_console_frames(c: &mut Criterion) {
    let rom_data = create_minimal_rom();
    let mut console = Console::new(&rom_data).expect("failed to create console");
    console.power_on();

    let mut group = c.benchmark_group("console");
    group.throughput(Throughput::Elements(1));
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("60_frames", |b| {
        b.iter(|| {
            for _ in 0..60 {
                console.step_frame();
            }
            black_box(console.framebuffer());
        });
    });

    group.finish();
}

fn bench_rom_loading(c: &mut Criterion) {
    let rom_data = create_minimal_rom();

    let mut group = c.benchmark_group("initialization");
    group.throughput(Throughput::Elements(1));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("console_new", |b| {
        b.iter(|| {
            let console = Console::new(black_box(&rom_data)).expect("failed to create console");
            black_box(console);
        });
    });

    group.bench_function("power_on", |b| {
        let mut console = Console::new(&rom_data).expect("failed to create console");
        b.iter(|| {
            console.power_on();
            black_box(console.total_cycles());
        });
    });

    group.bench_function("reset", |b| {
        let mut console = Console::new(&rom_data).expect("failed to create console");
        console.power_on();
        b.iter(|| {
            console.reset();
            black_box(console.total_cycles());
        });
    });

    group.finish();
}

fn bench_mapper_variations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mappers");
    group.measurement_time(Duration::from_secs(5));

    for (label, rom_data) in [
        ("NROM", create_minimal_rom()),
        ("MMC1", create_mmc1_rom()),
        ("MMC3", create_mmc3_rom()),
    ] {
        let mut console = Console::new(&rom_data).expect("failed to create console");
        console.power_on();

        group.bench_with_input(BenchmarkId::new("frame", label), &(), |b, ()| {
            b.iter(|| {
                console.step_frame();
                black_box(console.framebuffer());
            });
        });
    }

    group.finish();
}

fn bench_memory_access(c: &mut Criterion) {
    let rom_data = create_minimal_rom();
    let mut console = Console::new(&rom_data).expect("failed to create console");
    console.power_on();

    let mut group = c.benchmark_group("memory");
    group.throughput(Throughput::Bytes(1));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("peek_ram", |b| {
        b.iter(|| {
            black_box(console.peek_memory(black_box(0x0000)));
        });
    });

    group.bench_function("peek_prg", |b| {
        b.iter(|| {
            black_box(console.peek_memory(black_box(0x8000)));
        });
    });

    group.bench_function("peek_sequential_256", |b| {
        b.iter(|| {
            for addr in 0..256u16 {
                black_box(console.peek_memory(addr));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_cpu_instructions,
    bench_ppu_frames,
    bench_console_frames,
    bench_rom_loading,
    bench_mapper_variations,
    bench_memory_access,
);
criterion_main!(benches);
