#![no_std]
#![no_main]

use program::{
    close, entry, exec, fork, getpid, open, println, read, sleep, time, wait, yield_now,
};

entry!(main);

fn main() -> i32 {
    println!("init: hello from user mode");
    println!("init: pid {}", getpid());

    let start = time();
    sleep(50);
    println!("init: slept {} ms", time() - start);
    yield_now();

    let mut status = 0;
    let mut buf = [0u8; 8];
    let unsupported = [
        ("exec", exec("/bin/sh")),
        ("fork", fork()),
        ("wait", wait(&mut status)),
        ("open", open("/etc/motd", 0)),
        ("close", close(3)),
        ("read", read(0, &mut buf)),
    ];
    for (name, ret) in unsupported {
        println!("init: {name} -> {ret}");
    }

    for second in 1..=3 {
        sleep(1000);
        println!("init: {second}s (time={} ms)", time());
    }
    0
}
