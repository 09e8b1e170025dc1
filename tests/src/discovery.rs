mod fakes;
mod integration;
mod loopback;
